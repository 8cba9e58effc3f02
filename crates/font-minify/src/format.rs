//! Font container formats accepted by the minifier.

use core::{fmt, str::FromStr};

use crate::errors::{FormatError, FormatErrorKind};

/// Format of the font being read.
///
/// SVG fonts are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ReadFormat {
    /// TrueType font.
    Ttf,
    /// OpenType font with CFF outlines.
    Otf,
    /// WOFF (zlib-compressed) font.
    Woff,
    /// WOFF2 (Brotli-compressed) font. Requires the WOFF2 codec.
    Woff2,
    /// Embedded OpenType font.
    Eot,
}

/// Format of the produced font.
///
/// Unlike [`ReadFormat`], OTF is not a valid output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WriteFormat {
    /// TrueType font.
    Ttf,
    /// WOFF (zlib-compressed) font.
    Woff,
    /// WOFF2 (Brotli-compressed) font. Requires the WOFF2 codec.
    Woff2,
    /// Embedded OpenType font.
    Eot,
}

impl ReadFormat {
    const EOT_MAGIC_OFFSET: usize = 34;

    /// Returns the conventional file extension (without the leading dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Ttf => "ttf",
            Self::Otf => "otf",
            Self::Woff => "woff",
            Self::Woff2 => "woff2",
            Self::Eot => "eot",
        }
    }

    /// Checks whether this format requires the WOFF2 codec.
    pub fn is_compressed(self) -> bool {
        matches!(self, Self::Woff2)
    }

    /// Guesses the format from the container signature of font data.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [b'w', b'O', b'F', b'2', ..] => return Some(Self::Woff2),
            [b'w', b'O', b'F', b'F', ..] => return Some(Self::Woff),
            [b'O', b'T', b'T', b'O', ..] => return Some(Self::Otf),
            [0, 1, 0, 0, ..] | [b't', b'r', b'u', b'e', ..] => return Some(Self::Ttf),
            _ => { /* check EOT below */ }
        }

        // EOT header stores the magic number 0x504C (little-endian) at a fixed offset.
        let magic = bytes.get(Self::EOT_MAGIC_OFFSET..Self::EOT_MAGIC_OFFSET + 2)?;
        (magic == [0x4c, 0x50]).then_some(Self::Eot)
    }
}

impl WriteFormat {
    /// Returns the conventional file extension (without the leading dot).
    pub fn extension(self) -> &'static str {
        ReadFormat::from(self).extension()
    }

    /// Checks whether this format requires the WOFF2 codec.
    pub fn is_compressed(self) -> bool {
        matches!(self, Self::Woff2)
    }
}

impl From<WriteFormat> for ReadFormat {
    fn from(format: WriteFormat) -> Self {
        match format {
            WriteFormat::Ttf => Self::Ttf,
            WriteFormat::Woff => Self::Woff,
            WriteFormat::Woff2 => Self::Woff2,
            WriteFormat::Eot => Self::Eot,
        }
    }
}

impl TryFrom<ReadFormat> for WriteFormat {
    type Error = FormatError;

    fn try_from(format: ReadFormat) -> Result<Self, Self::Error> {
        Ok(match format {
            ReadFormat::Ttf => Self::Ttf,
            ReadFormat::Woff => Self::Woff,
            ReadFormat::Woff2 => Self::Woff2,
            ReadFormat::Eot => Self::Eot,
            ReadFormat::Otf => {
                return Err(FormatError::new(
                    FormatErrorKind::UnsupportedOutput,
                    format.extension(),
                ))
            }
        })
    }
}

impl fmt::Display for ReadFormat {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.extension())
    }
}

impl fmt::Display for WriteFormat {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.extension())
    }
}

fn normalize(s: &str) -> String {
    s.trim().trim_start_matches('.').to_ascii_lowercase()
}

impl FromStr for ReadFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match normalize(s).as_str() {
            "ttf" => Self::Ttf,
            "otf" => Self::Otf,
            "woff" => Self::Woff,
            "woff2" => Self::Woff2,
            "eot" => Self::Eot,
            "svg" => return Err(FormatError::new(FormatErrorKind::UnsupportedInput, s)),
            _ => return Err(FormatError::new(FormatErrorKind::Unknown, s)),
        })
    }
}

impl FromStr for WriteFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match normalize(s).as_str() {
            "ttf" => Self::Ttf,
            "woff" => Self::Woff,
            "woff2" => Self::Woff2,
            "eot" => Self::Eot,
            "otf" | "svg" => return Err(FormatError::new(FormatErrorKind::UnsupportedOutput, s)),
            _ => return Err(FormatError::new(FormatErrorKind::Unknown, s)),
        })
    }
}
