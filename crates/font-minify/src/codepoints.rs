//! Plain-text code point extraction.

use std::{collections::HashSet, slice, vec};

/// Numeric code point as handed to the font engine.
///
/// This is not a `char`: code points produced by escape references are not range-checked,
/// and it's up to the engine to reject values outside the Unicode scalar range.
pub type Codepoint = u32;

/// Insertion-ordered set of code points.
///
/// The order of the set is the order in which code points were first inserted; re-inserting
/// a code point is a no-op and does not move it.
#[derive(Debug, Clone, Default)]
pub struct CodepointSet {
    ordered: Vec<Codepoint>,
    seen: HashSet<Codepoint>,
}

impl PartialEq for CodepointSet {
    fn eq(&self, other: &Self) -> bool {
        self.ordered == other.ordered
    }
}

impl Eq for CodepointSet {}

impl CodepointSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a code point. Returns `false` if the code point is already present.
    pub fn insert(&mut self, codepoint: Codepoint) -> bool {
        let is_new = self.seen.insert(codepoint);
        if is_new {
            self.ordered.push(codepoint);
        }
        is_new
    }

    /// Checks whether the set contains the specified code point.
    pub fn contains(&self, codepoint: Codepoint) -> bool {
        self.seen.contains(&codepoint)
    }

    /// Returns the number of code points in this set.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Checks whether this set is empty.
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Iterates over code points in the insertion order.
    pub fn iter(&self) -> slice::Iter<'_, Codepoint> {
        self.ordered.iter()
    }

    /// Returns code points in the insertion order.
    pub fn as_slice(&self) -> &[Codepoint] {
        &self.ordered
    }

    /// Converts this set into a vector, preserving the insertion order.
    pub fn into_vec(self) -> Vec<Codepoint> {
        self.ordered
    }

    /// Iterates over members that are valid Unicode scalar values.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.ordered.iter().copied().filter_map(char::from_u32)
    }
}

impl Extend<Codepoint> for CodepointSet {
    fn extend<I: IntoIterator<Item = Codepoint>>(&mut self, iter: I) {
        for codepoint in iter {
            self.insert(codepoint);
        }
    }
}

impl FromIterator<Codepoint> for CodepointSet {
    fn from_iter<I: IntoIterator<Item = Codepoint>>(iter: I) -> Self {
        let mut this = Self::new();
        this.extend(iter);
        this
    }
}

impl IntoIterator for CodepointSet {
    type Item = Codepoint;
    type IntoIter = vec::IntoIter<Codepoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.ordered.into_iter()
    }
}

impl<'a> IntoIterator for &'a CodepointSet {
    type Item = &'a Codepoint;
    type IntoIter = slice::Iter<'a, Codepoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Collects distinct Unicode scalar values of `text` in the order of their first occurrence.
///
/// Characters outside the Basic Multilingual Plane (e.g., emoji) produce a single code point.
pub fn extract_codepoints(text: &str) -> CodepointSet {
    text.chars().map(Codepoint::from).collect()
}

/// Returns `text` with repeated characters removed, keeping the first occurrence of each.
pub fn unique_chars(text: &str) -> String {
    extract_codepoints(text).chars().collect()
}
