//! Scanning for icon-font escape references.

use crate::Codepoint;

/// Prefix of an [`EscapeReference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EscapePrefix {
    /// HTML numeric character reference opener: `&#x` or `&#X`.
    CharRef,
    /// CSS escape: a single backslash.
    Backslash,
}

impl EscapePrefix {
    fn match_at(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [b'&', b'#', b'x' | b'X', ..] => Some(Self::CharRef),
            [b'\\', ..] => Some(Self::Backslash),
            _ => None,
        }
    }

    /// Returns the length of this prefix in bytes.
    pub fn byte_len(self) -> usize {
        match self {
            Self::CharRef => 3,
            Self::Backslash => 1,
        }
    }
}

/// Occurrence of an escape reference in text, such as `&#xe001` or `\e001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeReference<'a> {
    prefix: EscapePrefix,
    digits: &'a str,
    offset: usize,
}

impl<'a> EscapeReference<'a> {
    /// Returns the prefix of this reference.
    pub fn prefix(&self) -> EscapePrefix {
        self.prefix
    }

    /// Returns the hex digits following the prefix. Never empty.
    pub fn digits(&self) -> &'a str {
        self.digits
    }

    /// Returns the byte offset of the prefix in the scanned text.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the byte length of the whole reference, including the prefix.
    pub fn byte_len(&self) -> usize {
        self.prefix.byte_len() + self.digits.len()
    }

    /// Parses the digits as a base-16 integer.
    ///
    /// The value is not checked against the Unicode scalar range. Digit runs whose value
    /// does not fit into `u32` saturate to `u32::MAX`.
    pub fn code_point(&self) -> Codepoint {
        self.digits.bytes().fold(0, |acc: Codepoint, digit| {
            let digit = Codepoint::from(hex_value(digit));
            acc.checked_mul(16)
                .and_then(|acc| acc.checked_add(digit))
                .unwrap_or(Codepoint::MAX)
        })
    }
}

/// Callers must only pass ASCII hex digits.
fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => unreachable!("not a hex digit: {digit}"),
    }
}

/// Iterator over [`EscapeReference`]s in text, from left to right.
///
/// Scanning is leftmost and greedy: once a prefix is matched, the longest run of hex digits
/// after it is consumed and scanning resumes at the first non-hex char. A prefix not followed
/// by at least one hex digit is not a reference; scanning then resumes right after the
/// first byte of the prefix.
#[derive(Debug, Clone)]
pub struct EscapeScanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> EscapeScanner<'a> {
    /// Creates a scanner over the specified text.
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for EscapeScanner<'a> {
    type Item = EscapeReference<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        // Prefixes and digits are ASCII, and no UTF-8 continuation byte matches ASCII.
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() {
            let start = self.pos;
            let Some(prefix) = EscapePrefix::match_at(&bytes[start..]) else {
                self.pos += 1;
                continue;
            };

            let digits_start = start + prefix.byte_len();
            let digits_len = bytes[digits_start..]
                .iter()
                .take_while(|byte| byte.is_ascii_hexdigit())
                .count();
            if digits_len == 0 {
                self.pos += 1;
                continue;
            }

            let digits_end = digits_start + digits_len;
            self.pos = digits_end;
            return Some(EscapeReference {
                prefix,
                digits: &self.text[digits_start..digits_end],
                offset: start,
            });
        }
        None
    }
}

/// Finds escape references in `text` and returns the code points they denote in the order
/// of appearance. The output may contain duplicates.
pub fn scan_escape_references(text: &str) -> Vec<Codepoint> {
    EscapeScanner::new(text)
        .map(|reference| reference.code_point())
        .collect()
}
