// Copyright 2025 the StyledStrings Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Search, split and classification operations.
//!
//! These all work on the plain text projection and hand span-preserving
//! slices back, so a character keeps its styles through every one of them.

use crate::{Error, StyledString};

impl StyledString {
    /// The byte offset of the first occurrence of `needle`.
    pub fn find(&self, needle: &str) -> Option<usize> {
        self.plain().find(needle)
    }

    /// The byte offset of the last occurrence of `needle`.
    pub fn rfind(&self, needle: &str) -> Option<usize> {
        self.plain().rfind(needle)
    }

    /// As [`find`](Self::find), but an absent needle is an error.
    ///
    /// # Errors
    ///
    /// [`Error::SubstringNotFound`] if `needle` does not occur.
    pub fn index_of(&self, needle: &str) -> Result<usize, Error> {
        self.find(needle).ok_or(Error::SubstringNotFound)
    }

    /// As [`rfind`](Self::rfind), but an absent needle is an error.
    ///
    /// # Errors
    ///
    /// [`Error::SubstringNotFound`] if `needle` does not occur.
    pub fn rindex_of(&self, needle: &str) -> Result<usize, Error> {
        self.rfind(needle).ok_or(Error::SubstringNotFound)
    }

    /// Returns `true` if the plain text contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.plain().contains(needle)
    }

    /// Counts non-overlapping occurrences of `needle`.
    pub fn count_matches(&self, needle: &str) -> usize {
        self.plain().matches(needle).count()
    }

    /// Returns `true` if the plain text starts with `prefix`. Styles are
    /// ignored.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.plain().starts_with(prefix)
    }

    /// Returns `true` if the plain text ends with `suffix`. Styles are
    /// ignored.
    pub fn ends_with(&self, suffix: &str) -> bool {
        self.plain().ends_with(suffix)
    }

    /// Returns `true` if the string starts with `prefix`, styles included:
    /// the leading slice must compare equal to `prefix` as a styled string.
    pub fn starts_with_styled(&self, prefix: &Self) -> bool {
        let n = prefix.len();
        if n > self.len() || !self.is_char_boundary(n) {
            return false;
        }
        self.slice_bytes(0, n) == *prefix
    }

    /// Returns `true` if the string ends with `suffix`, styles included.
    pub fn ends_with_styled(&self, suffix: &Self) -> bool {
        let len = self.len();
        let n = suffix.len();
        if n > len || !self.is_char_boundary(len - n) {
            return false;
        }
        self.slice_bytes(len - n, len) == *suffix
    }

    /// Splits at the first occurrence of `separator` into
    /// `(before, separator, after)`.
    ///
    /// When `separator` does not occur the whole string is returned in the
    /// first position and the other two are empty.
    pub fn partition(&self, separator: &str) -> (Self, Self, Self) {
        match self.find(separator) {
            Some(index) => (
                self.slice_bytes(0, index),
                self.slice_bytes(index, index + separator.len()),
                self.slice_bytes(index + separator.len(), self.len()),
            ),
            None => (self.clone(), Self::new(), Self::new()),
        }
    }

    /// Splits at the last occurrence of `separator` into
    /// `(before, separator, after)`.
    ///
    /// When `separator` does not occur the whole string is returned in the
    /// last position and the other two are empty.
    pub fn rpartition(&self, separator: &str) -> (Self, Self, Self) {
        match self.rfind(separator) {
            Some(index) => (
                self.slice_bytes(0, index),
                self.slice_bytes(index, index + separator.len()),
                self.slice_bytes(index + separator.len(), self.len()),
            ),
            None => (Self::new(), Self::new(), self.clone()),
        }
    }

    /// Splits on `separator`, or on runs of whitespace when `separator` is
    /// `None`.
    ///
    /// At most `max_splits` splits are made when given, counted from the
    /// left; the remainder stays in the last piece. Whitespace mode never
    /// yields empty pieces, separator mode keeps them, matching the usual
    /// string-split conventions. An empty separator makes no splits and
    /// yields the whole string as the single piece.
    pub fn split(&self, separator: Option<&str>, max_splits: Option<usize>) -> Vec<Self> {
        let plain = self.plain();
        let ranges = match separator {
            Some(separator) => split_ranges(&plain, separator, max_splits),
            None => whitespace_ranges(&plain, max_splits),
        };
        ranges
            .into_iter()
            .map(|(start, end)| self.slice_bytes(start, end))
            .collect()
    }

    /// As [`split`](Self::split), scanning from the right: `max_splits` is
    /// counted from the right, and overlapping separator occurrences
    /// resolve rightmost first.
    pub fn rsplit(&self, separator: Option<&str>, max_splits: Option<usize>) -> Vec<Self> {
        let plain = self.plain();
        let ranges = match separator {
            Some(separator) => rsplit_ranges(&plain, separator, max_splits),
            None => {
                let mut ranges = whitespace_ranges(&plain, None);
                if let Some(max) = max_splits {
                    if ranges.len() > max + 1 {
                        // Merge everything before the last `max` separators
                        // into one leading piece.
                        let keep_from = ranges.len() - max;
                        let merged = (ranges[0].0, ranges[keep_from - 1].1);
                        ranges.drain(..keep_from);
                        ranges.insert(0, merged);
                    }
                }
                ranges
            }
        };
        ranges
            .into_iter()
            .map(|(start, end)| self.slice_bytes(start, end))
            .collect()
    }

    /// Splits into lines at `\n`, `\r` or `\r\n`.
    ///
    /// Line endings are kept on their lines when `keep_ends` is set. A
    /// trailing line ending does not produce an empty final line.
    pub fn splitlines(&self, keep_ends: bool) -> Vec<Self> {
        let plain = self.plain();
        let bytes = plain.as_bytes();
        let mut lines = Vec::new();
        let mut start = 0;
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'\n' || bytes[i] == b'\r' {
                let mut next = i + 1;
                if bytes[i] == b'\r' && next < bytes.len() && bytes[next] == b'\n' {
                    next += 1;
                }
                let end = if keep_ends { next } else { i };
                lines.push(self.slice_bytes(start, end));
                start = next;
                i = next;
            } else {
                i += 1;
            }
        }
        if start < bytes.len() {
            lines.push(self.slice_bytes(start, bytes.len()));
        }
        lines
    }

    /// Removes leading characters in `chars`, or leading whitespace when
    /// `chars` is `None`.
    pub fn lstrip(&self, chars: Option<&str>) -> Self {
        let plain = self.plain();
        let kept = match chars {
            Some(set) => plain.trim_start_matches(|c| set.contains(c)).len(),
            None => plain.trim_start().len(),
        };
        if kept == plain.len() {
            return self.clone();
        }
        self.slice_bytes(plain.len() - kept, self.len())
    }

    /// Removes trailing characters in `chars`, or trailing whitespace when
    /// `chars` is `None`.
    pub fn rstrip(&self, chars: Option<&str>) -> Self {
        let plain = self.plain();
        let kept = match chars {
            Some(set) => plain.trim_end_matches(|c| set.contains(c)).len(),
            None => plain.trim_end().len(),
        };
        if kept == plain.len() {
            return self.clone();
        }
        self.slice_bytes(0, kept)
    }

    /// Removes characters in `chars` from both ends, or whitespace when
    /// `chars` is `None`.
    pub fn strip(&self, chars: Option<&str>) -> Self {
        self.lstrip(chars).rstrip(chars)
    }

    /// Returns `true` if the string is non-empty and every character is
    /// alphabetic.
    pub fn is_alphabetic(&self) -> bool {
        self.all_chars(char::is_alphabetic)
    }

    /// Returns `true` if the string is non-empty and every character is
    /// alphanumeric.
    pub fn is_alphanumeric(&self) -> bool {
        self.all_chars(char::is_alphanumeric)
    }

    /// Returns `true` if the string is non-empty and every character is
    /// numeric.
    pub fn is_numeric(&self) -> bool {
        self.all_chars(char::is_numeric)
    }

    /// Returns `true` if the string is non-empty and every character is
    /// whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.all_chars(char::is_whitespace)
    }

    /// Returns `true` if the string has at least one cased character and no
    /// lowercase ones.
    pub fn is_uppercase(&self) -> bool {
        let plain = self.plain();
        plain.chars().any(char::is_uppercase) && !plain.chars().any(char::is_lowercase)
    }

    /// Returns `true` if the string has at least one cased character and no
    /// uppercase ones.
    pub fn is_lowercase(&self) -> bool {
        let plain = self.plain();
        plain.chars().any(char::is_lowercase) && !plain.chars().any(char::is_uppercase)
    }

    /// Returns `true` if every byte is ASCII. The empty string is ASCII.
    pub fn is_ascii(&self) -> bool {
        self.plain().is_ascii()
    }

    fn all_chars(&self, predicate: impl Fn(char) -> bool) -> bool {
        let plain = self.plain();
        !plain.is_empty() && plain.chars().all(predicate)
    }
}

/// Byte ranges of the pieces of `plain` split on `separator`.
fn split_ranges(plain: &str, separator: &str, max_splits: Option<usize>) -> Vec<(usize, usize)> {
    if separator.is_empty() {
        return vec![(0, plain.len())];
    }
    let mut ranges = Vec::new();
    let mut start = 0;
    loop {
        if max_splits.is_some_and(|max| ranges.len() == max) {
            break;
        }
        match plain[start..].find(separator) {
            Some(found) => {
                let at = start + found;
                ranges.push((start, at));
                start = at + separator.len();
            }
            None => break,
        }
    }
    ranges.push((start, plain.len()));
    ranges
}

/// Byte ranges of the pieces of `plain` split on `separator`, scanning from
/// the right.
fn rsplit_ranges(plain: &str, separator: &str, max_splits: Option<usize>) -> Vec<(usize, usize)> {
    if separator.is_empty() {
        return vec![(0, plain.len())];
    }
    let mut ranges = Vec::new();
    let mut end = plain.len();
    loop {
        if max_splits.is_some_and(|max| ranges.len() == max) {
            break;
        }
        match plain[..end].rfind(separator) {
            Some(at) => {
                ranges.push((at + separator.len(), end));
                end = at;
            }
            None => break,
        }
    }
    ranges.push((0, end));
    ranges.reverse();
    ranges
}

/// Byte ranges of the whitespace-separated words of `plain`.
///
/// With a split limit, the final range runs from the first non-whitespace
/// after the limit to the end of the string, trailing whitespace included.
fn whitespace_ranges(plain: &str, max_splits: Option<usize>) -> Vec<(usize, usize)> {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    let mut word_start: Option<usize> = None;
    for (index, c) in plain.char_indices() {
        if let Some(start) = word_start {
            if c.is_whitespace() {
                ranges.push((start, index));
                word_start = None;
            }
        } else if !c.is_whitespace() {
            if max_splits.is_some_and(|max| ranges.len() == max) {
                // The remainder is one piece, whatever it contains.
                ranges.push((index, plain.len()));
                return ranges;
            }
            word_start = Some(index);
        }
    }
    if let Some(start) = word_start {
        ranges.push((start, plain.len()));
    }
    ranges
}
