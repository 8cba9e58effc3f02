//! Interfaces of the external collaborators: the font engine and the WOFF2 codec.

use core::future::Future;
use std::error::Error as StdError;

use crate::{Codepoint, ReadFormat, SubsetRequest, WriteFormat};

/// Options for reading a font.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub struct ReadOptions {
    /// Declared format of the font data.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub format: ReadFormat,
    /// Code points retained in addition to those used by the text. These come first
    /// in the subset request.
    #[cfg_attr(feature = "serde", serde(default))]
    pub subset: Vec<Codepoint>,
    /// Keep hinting tables.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hinting: bool,
    /// Keep kerning tables.
    #[cfg_attr(feature = "serde", serde(default))]
    pub kerning: bool,
    /// Convert composite glyphs to simple ones.
    #[cfg_attr(feature = "serde", serde(default))]
    pub compound_to_simple: bool,
}

impl ReadOptions {
    /// Creates options with the specified format and all flags off.
    pub fn new(format: ReadFormat) -> Self {
        Self {
            format,
            subset: Vec::new(),
            hinting: false,
            kerning: false,
            compound_to_simple: false,
        }
    }

    /// Adds code points to retain regardless of the text.
    #[must_use]
    pub fn with_subset(mut self, codepoints: impl IntoIterator<Item = Codepoint>) -> Self {
        self.subset.extend(codepoints);
        self
    }

    /// Sets whether hinting tables are kept.
    #[must_use]
    pub fn with_hinting(mut self, hinting: bool) -> Self {
        self.hinting = hinting;
        self
    }

    /// Sets whether kerning tables are kept.
    #[must_use]
    pub fn with_kerning(mut self, kerning: bool) -> Self {
        self.kerning = kerning;
        self
    }

    /// Sets whether composite glyphs are converted to simple ones.
    #[must_use]
    pub fn with_compound_to_simple(mut self, convert: bool) -> Self {
        self.compound_to_simple = convert;
        self
    }
}

/// Options for writing a font.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub struct WriteOptions {
    /// Output format.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub format: WriteFormat,
    /// Keep hinting tables.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hinting: bool,
    /// Keep kerning tables.
    #[cfg_attr(feature = "serde", serde(default))]
    pub kerning: bool,
    /// Extended metadata (XML) embedded into WOFF output. Ignored by other formats.
    #[cfg_attr(feature = "serde", serde(default))]
    pub metadata: Option<String>,
}

impl WriteOptions {
    /// Creates options with the specified format and all flags off.
    pub fn new(format: WriteFormat) -> Self {
        Self {
            format,
            hinting: false,
            kerning: false,
            metadata: None,
        }
    }

    /// Sets whether hinting tables are kept.
    #[must_use]
    pub fn with_hinting(mut self, hinting: bool) -> Self {
        self.hinting = hinting;
        self
    }

    /// Sets whether kerning tables are kept.
    #[must_use]
    pub fn with_kerning(mut self, kerning: bool) -> Self {
        self.kerning = kerning;
        self
    }

    /// Sets WOFF metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }
}

/// Read configuration handed to a [`FontEngine`]: caller-supplied options together with
/// the final subsetting allow-list.
#[derive(Debug, Clone, Copy)]
pub struct ReadRequest<'a> {
    options: &'a ReadOptions,
    subset: &'a SubsetRequest,
}

impl<'a> ReadRequest<'a> {
    pub(crate) fn new(options: &'a ReadOptions, subset: &'a SubsetRequest) -> Self {
        Self { options, subset }
    }

    /// Returns the declared format of the font data.
    pub fn format(&self) -> ReadFormat {
        self.options.format
    }

    /// Returns the read options. Note that [`ReadOptions::subset`] is already merged
    /// into [`Self::subset()`].
    pub fn options(&self) -> &'a ReadOptions {
        self.options
    }

    /// Returns code points the subsetted font must retain, in the request order.
    pub fn subset(&self) -> &'a [Codepoint] {
        self.subset.as_slice()
    }
}

/// Font-editing engine that parses, subsets and serializes fonts.
///
/// The engine owns all knowledge of binary font formats. It subsets exactly the code points
/// it is given; code points outside the Unicode range may be rejected with an error.
pub trait FontEngine {
    /// In-memory font produced by [`Self::read()`].
    type Font;
    /// Engine error.
    type Error: StdError + 'static;

    /// Parses `bytes` retaining only the glyphs for [`ReadRequest::subset()`].
    ///
    /// # Errors
    ///
    /// Should return an error if the data is malformed or cannot be subsetted.
    fn read(&self, bytes: &[u8], request: &ReadRequest<'_>) -> Result<Self::Font, Self::Error>;

    /// Serializes the font into a buffer.
    ///
    /// # Errors
    ///
    /// Should return an error if the font cannot be serialized in the requested format.
    fn write(&self, font: Self::Font, options: &WriteOptions) -> Result<Vec<u8>, Self::Error>;
}

/// WOFF2 compression codec with an explicit asynchronous initialization step
/// (e.g., loading a WebAssembly payload).
///
/// Codecs do not need to track whether they are initialized; wrap them in
/// a [`CodecGuard`](crate::CodecGuard) instead.
///
/// The future returned by [`Self::initialize()`] must be `Send`, so that minification can run
/// on a multi-threaded runtime. A codec that can only be driven from a single thread
/// (e.g., one holding a `!Send` WebAssembly instance) cannot implement this trait directly;
/// it should be run on a dedicated thread or a `LocalSet` and implement the trait
/// as a `Send` handle communicating with it.
pub trait Woff2Codec {
    /// Initialization error.
    type Error: StdError + 'static;

    /// Initializes the codec using the runtime payload at `locator`.
    fn initialize(&self, locator: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
