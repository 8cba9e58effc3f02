//! Font minification: shrinking a font to the glyphs used by a piece of text.
//!
//! Parsing, subsetting and re-encoding of font files are delegated to an external
//! [`FontEngine`], and WOFF2 compression to an external [`Woff2Codec`]. This crate
//! owns the part that decides *which* code points survive subsetting:
//!
//! - [`extract_codepoints()`] collects the distinct Unicode scalar values of the text.
//! - [`scan_escape_references()`] finds icon-font escape references (`&#xE001;`, `\e001`)
//!   and yields the code points they denote.
//! - [`Minifier`] merges both into a [`SubsetRequest`] and drives the engine,
//!   initializing the codec (once per [`CodecGuard`]) when WOFF2 is involved.
//!
//! # Examples
//!
//! ```
//! use font_minify::{extract_codepoints, scan_escape_references, SubsetRequest};
//!
//! let text = "Hi \u{e001} &#xe002;";
//! assert_eq!(extract_codepoints(text).len(), 11);
//! assert_eq!(scan_escape_references(text), [0xe002]);
//!
//! let request = SubsetRequest::build(&[], text);
//! assert!(request.contains(0xe001) && request.contains(0xe002));
//! ```

#![doc(html_root_url = "https://docs.rs/font-minify/0.1.0")]

mod codec;
mod codepoints;
mod engine;
mod errors;
mod escapes;
mod format;
mod minify;
#[cfg(test)]
pub(crate) mod tests;

#[cfg(doctest)]
doc_comment::doctest!("../README.md");

pub use crate::{
    codec::{CodecGuard, DEFAULT_WOFF2_LOCATOR},
    codepoints::{extract_codepoints, unique_chars, Codepoint, CodepointSet},
    engine::{FontEngine, ReadOptions, ReadRequest, Woff2Codec, WriteOptions},
    errors::{FormatError, FormatErrorKind, MinifyError},
    escapes::{scan_escape_references, EscapePrefix, EscapeReference, EscapeScanner},
    format::{ReadFormat, WriteFormat},
    minify::{display_size, Minifier, MinifyOptions, SubsetRequest},
};
