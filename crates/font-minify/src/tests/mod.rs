//! Test fixtures: a fake font engine and a recording WOFF2 codec.

use std::{
    fmt,
    future::Future,
    ops,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use crate::{Codepoint, FontEngine, ReadFormat, ReadRequest, Woff2Codec, WriteOptions};

pub(crate) const SAMPLE_TEXTS: [&str; 5] = [
    "",
    "Font-Minify-0.1.0 你说，儿豁中国人不骗中国人",
    "😀👍🏽 emoji 🇺🇳",
    r"icons: \e900 \E901 &#xe902; &#Xe903;",
    "A\\41&#x41;aaa",
];

#[derive(Debug)]
pub(crate) struct CodecError {
    pub(crate) locator: String,
}

impl fmt::Display for CodecError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "cannot load codec payload from `{}`", self.locator)
    }
}

impl std::error::Error for CodecError {}

/// Codec recording its initialization calls.
#[derive(Debug, Default)]
pub(crate) struct RecordingCodec {
    calls: AtomicUsize,
    locators: Mutex<Vec<String>>,
    failing_locator: Option<&'static str>,
    delay: Option<Duration>,
    active: AtomicUsize,
    pub(crate) max_concurrency: AtomicUsize,
}

impl RecordingCodec {
    pub(crate) fn failing_for(locator: &'static str) -> Self {
        Self {
            failing_locator: Some(locator),
            ..Self::default()
        }
    }

    pub(crate) fn slow() -> Self {
        Self {
            delay: Some(Duration::from_millis(50)),
            ..Self::default()
        }
    }

    pub(crate) fn slow_failing_for(locator: &'static str) -> Self {
        Self {
            failing_locator: Some(locator),
            delay: Some(Duration::from_millis(200)),
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn locators(&self) -> Vec<String> {
        self.locators.lock().unwrap().clone()
    }
}

impl Woff2Codec for RecordingCodec {
    type Error = CodecError;

    fn initialize(&self, locator: &str) -> impl Future<Output = Result<(), CodecError>> + Send {
        let locator = locator.to_owned();
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.locators.lock().unwrap().push(locator.clone());
            let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_concurrency.fetch_max(active, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.active.fetch_sub(1, Ordering::SeqCst);

            if self.failing_locator == Some(locator.as_str()) {
                Err(CodecError { locator })
            } else {
                Ok(())
            }
        }
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum EngineError {
    Malformed,
    FormatMismatch { declared: ReadFormat },
    InvalidCodepoint(Codepoint),
    Metadata,
}

impl fmt::Display for EngineError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => formatter.write_str("malformed font data"),
            Self::FormatMismatch { declared } => {
                write!(formatter, "font data is not in the declared format ({declared})")
            }
            Self::InvalidCodepoint(cp) => write!(formatter, "invalid code point: {cp:#x}"),
            Self::Metadata => formatter.write_str("invalid WOFF metadata"),
        }
    }
}

impl std::error::Error for EngineError {}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FakeFont {
    pub(crate) format: ReadFormat,
    pub(crate) codepoints: Vec<Codepoint>,
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub(crate) format: ReadFormat,
    pub(crate) subset: Vec<Codepoint>,
    pub(crate) hinting: bool,
}

/// Engine for a toy text container: `FAKE {ext}\n` followed by comma-separated hex code points
/// of the glyphs present in the font. Subsetting keeps covered code points in the request order.
#[derive(Debug, Default)]
pub(crate) struct FakeEngine {
    requests: Mutex<Vec<RecordedRequest>>,
}

const FAKE_MAGIC: &str = "FAKE ";

pub(crate) fn fake_font(format: ReadFormat, chars: ops::RangeInclusive<char>) -> Vec<u8> {
    let font = FakeFont {
        format,
        codepoints: chars.map(Codepoint::from).collect(),
    };
    FakeEngine::serialize(&font)
}

impl FakeEngine {
    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn parse(bytes: &[u8]) -> Result<FakeFont, EngineError> {
        let text = std::str::from_utf8(bytes).map_err(|_| EngineError::Malformed)?;
        let text = text.strip_prefix(FAKE_MAGIC).ok_or(EngineError::Malformed)?;
        let (format, codepoints) = text.split_once('\n').ok_or(EngineError::Malformed)?;
        let format = format.parse().map_err(|_| EngineError::Malformed)?;
        let codepoints = codepoints
            .split(',')
            .filter(|s| !s.is_empty())
            .map(|s| Codepoint::from_str_radix(s, 16).map_err(|_| EngineError::Malformed))
            .collect::<Result<_, _>>()?;
        Ok(FakeFont { format, codepoints })
    }

    fn serialize(font: &FakeFont) -> Vec<u8> {
        let codepoints: Vec<_> = font.codepoints.iter().map(|cp| format!("{cp:x}")).collect();
        format!("{FAKE_MAGIC}{}\n{}", font.format, codepoints.join(",")).into_bytes()
    }
}

impl FontEngine for FakeEngine {
    type Font = FakeFont;
    type Error = EngineError;

    fn read(&self, bytes: &[u8], request: &ReadRequest<'_>) -> Result<Self::Font, Self::Error> {
        self.requests.lock().unwrap().push(RecordedRequest {
            format: request.format(),
            subset: request.subset().to_vec(),
            hinting: request.options().hinting,
        });

        let font = Self::parse(bytes)?;
        if font.format != request.format() {
            return Err(EngineError::FormatMismatch {
                declared: request.format(),
            });
        }
        if let Some(&cp) = request.subset().iter().find(|&&cp| char::from_u32(cp).is_none()) {
            return Err(EngineError::InvalidCodepoint(cp));
        }

        let codepoints = request
            .subset()
            .iter()
            .copied()
            .filter(|cp| font.codepoints.contains(cp))
            .collect();
        Ok(FakeFont {
            format: font.format,
            codepoints,
        })
    }

    fn write(&self, font: Self::Font, options: &WriteOptions) -> Result<Vec<u8>, Self::Error> {
        if let Some(metadata) = &options.metadata {
            if !metadata.ends_with('>') {
                return Err(EngineError::Metadata);
            }
        }
        let font = FakeFont {
            format: options.format.into(),
            ..font
        };
        Ok(Self::serialize(&font))
    }
}

#[tokio::test]
async fn end_to_end_round_trip() {
    use std::sync::Arc;

    use crate::{CodecGuard, Minifier, MinifyOptions, ReadOptions, WriteFormat};

    let codec = Arc::new(CodecGuard::new(RecordingCodec::default()));
    let minifier = Minifier::new(FakeEngine::default(), Arc::clone(&codec));
    let font = fake_font(ReadFormat::Woff2, '\0'..='\u{ffff}');

    let mut prev_len = 0;
    for text in ["a", "ab", "abc", "abc\\e001", "abc\\e001 中国"] {
        let options = MinifyOptions::new(
            &font,
            text,
            ReadOptions::new(ReadFormat::Woff2),
            WriteOptions::new(WriteFormat::Woff2),
        );
        let output = minifier.minify(options).await.unwrap();
        assert!(output.len() < font.len());
        assert!(output.len() >= prev_len, "{text}");
        prev_len = output.len();

        // The output must be readable by the same engine in the same format.
        let parsed = FakeEngine::parse(&output).unwrap();
        assert_eq!(parsed.format, ReadFormat::Woff2);
        let reparsed_options = MinifyOptions::new(
            &output,
            text,
            ReadOptions::new(ReadFormat::Woff2),
            WriteOptions::new(WriteFormat::Woff2),
        );
        let again = minifier.minify(reparsed_options).await.unwrap();
        assert_eq!(again, output);
    }

    // Another minifier sharing the guard does not re-initialize the codec.
    let other = Minifier::new(FakeEngine::default(), Arc::clone(&codec));
    let options = MinifyOptions::new(
        &font,
        "x",
        ReadOptions::new(ReadFormat::Woff2),
        WriteOptions::new(WriteFormat::Ttf),
    );
    other.minify(options).await.unwrap();
    assert_eq!(codec.codec().calls(), 1);
}

#[tokio::test]
async fn format_mismatch_is_reported_by_engine() {
    use std::sync::Arc;

    use crate::{CodecGuard, Minifier, MinifyError, MinifyOptions, ReadOptions, WriteFormat};

    let minifier = Minifier::new(
        FakeEngine::default(),
        Arc::new(CodecGuard::new(RecordingCodec::default())),
    );
    let font = fake_font(ReadFormat::Eot, 'a'..='z');
    let options = MinifyOptions::new(
        &font,
        "abc",
        ReadOptions::new(ReadFormat::Otf),
        WriteOptions::new(WriteFormat::Eot),
    );
    let err = minifier.minify(options).await.unwrap_err();
    assert!(
        matches!(
            err,
            MinifyError::Read(EngineError::FormatMismatch {
                declared: ReadFormat::Otf
            })
        ),
        "{err:?}"
    );
    let requests = minifier.engine().requests();
    assert_eq!(requests[0].format, ReadFormat::Otf);
}
