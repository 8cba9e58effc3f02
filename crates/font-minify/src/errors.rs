use core::fmt;
use std::error::Error as StdError;

/// Kind of a [`FormatError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormatErrorKind {
    /// Format cannot be read (SVG).
    UnsupportedInput,
    /// Format cannot be written (SVG or OTF).
    UnsupportedOutput,
    /// Format is not recognized.
    Unknown,
}

impl fmt::Display for FormatErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::UnsupportedInput => "unsupported input font format",
            Self::UnsupportedOutput => "unsupported output font format",
            Self::Unknown => "unknown font format",
        })
    }
}

/// Errors that can occur when parsing a [`ReadFormat`](crate::ReadFormat)
/// or [`WriteFormat`](crate::WriteFormat).
#[derive(Debug, Clone)]
pub struct FormatError {
    kind: FormatErrorKind,
    format: String,
}

impl FormatError {
    pub(crate) fn new(kind: FormatErrorKind, format: &str) -> Self {
        Self {
            kind,
            format: format.to_owned(),
        }
    }

    /// Gets the error kind.
    pub fn kind(&self) -> &FormatErrorKind {
        &self.kind
    }

    /// Gets the format string that caused this error.
    pub fn format(&self) -> &str {
        &self.format
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: `{}`", self.kind, self.format)
    }
}

impl StdError for FormatError {}

/// Errors that can occur during [minification](crate::Minifier::minify()).
///
/// Errors from the external collaborators are surfaced as-is: `E` is the
/// [`FontEngine`](crate::FontEngine) error, and `C` is the [`Woff2Codec`](crate::Woff2Codec) error.
/// [`Minifier`](crate::Minifier) wraps the latter in an `Arc`, since a failed codec initialization
/// is reported to every call that waited on it.
#[derive(Debug)]
#[non_exhaustive]
pub enum MinifyError<E, C> {
    /// Initializing the WOFF2 codec failed.
    CodecInit(C),
    /// The engine failed to read the font (e.g., malformed data, or a code point
    /// in the subset it cannot handle).
    Read(E),
    /// The engine failed to serialize the subsetted font.
    Write(E),
}

impl<E, C> MinifyError<E, C> {
    /// Checks whether this error originates from the WOFF2 codec.
    pub fn is_codec_error(&self) -> bool {
        matches!(self, Self::CodecInit(_))
    }
}

impl<E: fmt::Display, C: fmt::Display> fmt::Display for MinifyError<E, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CodecInit(err) => write!(formatter, "failed initializing WOFF2 codec: {err}"),
            Self::Read(err) => write!(formatter, "failed reading font: {err}"),
            Self::Write(err) => write!(formatter, "failed writing font: {err}"),
        }
    }
}

impl<E, C> StdError for MinifyError<E, C>
where
    E: StdError + 'static,
    C: StdError + 'static,
{
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::CodecInit(err) => Some(err),
            Self::Read(err) | Self::Write(err) => Some(err),
        }
    }
}
