// Copyright 2025 the StyledStrings Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Case mapping and padding operations.
//!
//! Case maps apply to each text leaf in place, so the span structure is
//! untouched. Padding appends or prepends unstyled fill, leaving the
//! original string's styles intact.

use crate::{Segment, StyledString};

impl StyledString {
    /// Uppercases every character, preserving spans.
    pub fn upper(&self) -> Self {
        self.map_leaves(&|text| text.to_uppercase())
    }

    /// Lowercases every character, preserving spans.
    pub fn lower(&self) -> Self {
        self.map_leaves(&|text| text.to_lowercase())
    }

    /// Swaps the case of every character, preserving spans.
    pub fn swapcase(&self) -> Self {
        self.map_leaves(&|text| {
            text.chars()
                .map(|c| {
                    if c.is_uppercase() {
                        c.to_lowercase().collect()
                    } else if c.is_lowercase() {
                        c.to_uppercase().collect()
                    } else {
                        String::from(c)
                    }
                })
                .collect()
        })
    }

    /// Uppercases the first character, leaving the rest unchanged.
    pub fn capitalize(&self) -> Self {
        let Ok(first) = self.char_at(0) else {
            return self.clone();
        };
        let rest = self.slice_bytes(first.len(), self.len());
        first.upper() + rest
    }

    /// Title-cases the string: the first alphabetic character of each word
    /// is uppercased and the rest lowercased.
    ///
    /// Word boundaries are tracked across leaves, so a word split between
    /// differently styled spans is still cased as one word.
    pub fn title(&self) -> Self {
        let mut out = self.clone();
        let mut in_word = false;
        out.title_leaves(&mut in_word);
        out
    }

    /// Pads on the right with `fill` to `width` characters.
    pub fn ljust(&self, width: usize, fill: char) -> Self {
        let count = self.char_count();
        if count >= width {
            return self.clone();
        }
        let mut padded = self.clone();
        padded += pad(fill, width - count).as_str();
        padded
    }

    /// Pads on the left with `fill` to `width` characters.
    pub fn rjust(&self, width: usize, fill: char) -> Self {
        let count = self.char_count();
        if count >= width {
            return self.clone();
        }
        pad(fill, width - count).as_str() + self.clone()
    }

    /// Centers the string in `width` characters of `fill`, favouring the
    /// right when the padding is odd.
    pub fn center(&self, width: usize, fill: char) -> Self {
        let count = self.char_count();
        if count >= width {
            return self.clone();
        }
        let total = width - count;
        let left = total / 2;
        let mut padded: Self = pad(fill, left).as_str() + self.clone();
        padded += pad(fill, total - left).as_str();
        padded
    }

    /// Pads on the left with zeros to `width` characters.
    pub fn zfill(&self, width: usize) -> Self {
        self.rjust(width, '0')
    }

    fn map_leaves(&self, map: &impl Fn(&str) -> String) -> Self {
        let mut out = self.clone();
        out.map_leaves_in_place(map);
        out
    }

    fn map_leaves_in_place(&mut self, map: &impl Fn(&str) -> String) {
        for child in &mut self.children {
            match child {
                Segment::Text(text) => *text = map(text),
                Segment::Styled(nested) => nested.map_leaves_in_place(map),
            }
        }
    }

    fn title_leaves(&mut self, in_word: &mut bool) {
        for child in &mut self.children {
            match child {
                Segment::Text(text) => *text = title_fragment(text, in_word),
                Segment::Styled(nested) => nested.title_leaves(in_word),
            }
        }
    }
}

fn pad(fill: char, count: usize) -> String {
    String::from(fill).repeat(count)
}

fn title_fragment(text: &str, in_word: &mut bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let cased = c.is_alphabetic();
        if cased && !*in_word {
            out.extend(c.to_uppercase());
        } else if cased {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        *in_word = cased;
    }
    out
}
