//! Subset request building and the minification pipeline.

use std::sync::Arc;

use crate::{
    extract_codepoints, scan_escape_references, CodecGuard, Codepoint, CodepointSet, FontEngine,
    MinifyError, ReadFormat, ReadOptions, ReadRequest, Woff2Codec, WriteOptions,
};

/// Allow-list of code points passed to the [`FontEngine`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubsetRequest {
    codepoints: CodepointSet,
}

impl SubsetRequest {
    /// Builds a request for `text`.
    ///
    /// Code points are ordered as follows, with duplicates dropped on insertion: `seed`,
    /// then distinct chars of `text` in the order of first occurrence, then code points
    /// of escape references in `text` in the order of appearance. Thus, a code point referenced
    /// both literally and via an escape keeps its position from the literal occurrence.
    pub fn build(seed: &[Codepoint], text: &str) -> Self {
        let mut codepoints: CodepointSet = seed.iter().copied().collect();
        let plain = extract_codepoints(text);
        let plain_len = plain.len();
        codepoints.extend(plain);

        let escaped = scan_escape_references(text);
        let escaped_len = escaped.len();
        let len_before_escapes = codepoints.len();
        codepoints.extend(escaped);

        log::debug!(
            "built subset request: {} seed, {plain_len} plain-text, {escaped_len} escaped \
             ({} new) code points",
            seed.len(),
            codepoints.len() - len_before_escapes
        );
        Self { codepoints }
    }

    /// Returns code points in the request order.
    pub fn as_slice(&self) -> &[Codepoint] {
        self.codepoints.as_slice()
    }

    /// Returns the underlying set.
    pub fn codepoints(&self) -> &CodepointSet {
        &self.codepoints
    }

    /// Checks whether the request retains the specified code point.
    pub fn contains(&self, codepoint: Codepoint) -> bool {
        self.codepoints.contains(codepoint)
    }

    /// Returns the number of code points in the request.
    pub fn len(&self) -> usize {
        self.codepoints.len()
    }

    /// Checks whether the request is empty.
    pub fn is_empty(&self) -> bool {
        self.codepoints.is_empty()
    }
}

/// Inputs of a single [minification](Minifier::minify()).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct MinifyOptions<'a> {
    /// Source font data.
    pub buffer: &'a [u8],
    /// Text which glyphs should be retained.
    pub text: &'a str,
    /// Read options.
    pub read: ReadOptions,
    /// Write options.
    pub write: WriteOptions,
    /// Overrides the WOFF2 codec payload locator. Only has effect if the codec
    /// is not initialized yet.
    pub codec_locator: Option<String>,
}

impl<'a> MinifyOptions<'a> {
    /// Creates options with the default codec locator.
    pub fn new(buffer: &'a [u8], text: &'a str, read: ReadOptions, write: WriteOptions) -> Self {
        Self {
            buffer,
            text,
            read,
            write,
            codec_locator: None,
        }
    }

    /// Overrides the WOFF2 codec payload locator.
    #[must_use]
    pub fn with_codec_locator(mut self, locator: impl Into<String>) -> Self {
        self.codec_locator = Some(locator.into());
        self
    }

    fn needs_codec(&self) -> bool {
        self.read.format.is_compressed() || self.write.format.is_compressed()
    }
}

/// Font minifier driving a [`FontEngine`] and a shared [`CodecGuard`].
#[derive(Debug)]
pub struct Minifier<E, C: Woff2Codec> {
    engine: E,
    codec: Arc<CodecGuard<C>>,
}

impl<E: FontEngine, C: Woff2Codec> Minifier<E, C> {
    /// Creates a minifier. The `codec` guard should be shared across the process so that
    /// the codec is initialized at most once.
    pub fn new(engine: E, codec: Arc<CodecGuard<C>>) -> Self {
        Self { engine, codec }
    }

    /// Returns a reference to the font engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Returns the shared codec guard.
    pub fn codec(&self) -> &Arc<CodecGuard<C>> {
        &self.codec
    }

    /// Shrinks the font in `options.buffer` to the glyphs used by `options.text`.
    ///
    /// If either the read or the write format is WOFF2, the codec is initialized first
    /// (unless it already is). The engine output is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the codec initialization fails, or if the engine fails to read
    /// or write the font. No partial output is produced. The codec error is shared with
    /// other calls that waited on the same failed initialization.
    pub async fn minify(
        &self,
        options: MinifyOptions<'_>,
    ) -> Result<Vec<u8>, MinifyError<E::Error, Arc<C::Error>>> {
        let read_format = options.read.format;
        let write_format = options.write.format;
        if let Some(detected) = ReadFormat::detect(options.buffer) {
            if detected != read_format {
                log::warn!(
                    "font data looks like {detected}, but was declared as {read_format}; \
                     reading as {read_format}"
                );
            }
        }

        let request = SubsetRequest::build(&options.read.subset, options.text);
        if options.needs_codec() {
            self.codec
                .ensure_initialized(options.codec_locator.as_deref())
                .await
                .map_err(MinifyError::CodecInit)?;
        }

        let read_request = ReadRequest::new(&options.read, &request);
        let font = self
            .engine
            .read(options.buffer, &read_request)
            .map_err(MinifyError::Read)?;
        let output = self
            .engine
            .write(font, &options.write)
            .map_err(MinifyError::Write)?;

        log::info!(
            "minified font ({read_format} -> {write_format}, {} code points): {} -> {}",
            request.len(),
            display_size(options.buffer.len()),
            display_size(output.len())
        );
        Ok(output)
    }
}

/// Formats a byte size in decimal units with two fractional digits, e.g. `6.54 kB` or `2.10 MB`.
///
/// Halfway values are rounded up (`6545` bytes is `6.55 kB`), as locale-aware number
/// formatters do.
pub fn display_size(bytes: usize) -> String {
    const ONE_MILLION: usize = 1_000_000;
    const ONE_THOUSAND: usize = 1_000;

    let (unit, suffix) = if bytes >= ONE_MILLION {
        (ONE_MILLION, "MB")
    } else {
        (ONE_THOUSAND, "kB")
    };
    // Hundredths of `unit`, rounded half-up.
    let step = unit / 100;
    let hundredths = bytes / step + usize::from(bytes % step >= step / 2);
    format!("{}.{:02} {suffix}", hundredths / 100, hundredths % 100)
}
