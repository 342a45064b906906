// Copyright 2025 the StyledStrings Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::borrow::Cow;
use std::fmt;
use std::ops::{Add, AddAssign, Bound, RangeBounds};

use style_rules::{Markup, Rendition, StyleSheet};

use crate::{Error, Segment};

/// A string that keeps hierarchical style tags attached to its text.
///
/// A styled string is a sequence of [`Segment`]s, each either a run of plain
/// text or a nested styled string, together with an optional style name for
/// the node itself. Nesting styled strings nests their styles: a run of text
/// inherits the dot-joined chain of style names above it, its *context*,
/// which is what stylesheet rules select on.
///
/// Operations mirror the familiar string operations but preserve the style
/// spans of every character they keep. Indices are byte offsets into the
/// plain text projection, as for [`str`], and must fall on character
/// boundaries.
#[derive(Clone, Debug)]
pub struct StyledString {
    pub(crate) children: Vec<Segment>,
    pub(crate) style: Option<String>,
    pub(crate) normalized: bool,
}

impl StyledString {
    /// Creates an empty styled string with no style.
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            style: None,
            normalized: true,
        }
    }

    /// Wraps `value` in a node tagged with `style`.
    ///
    /// An unstyled argument is absorbed one level, so its children become
    /// the children of the new node; a styled argument is kept whole as a
    /// single nested child.
    pub fn styled(value: impl Into<Self>, style: impl Into<String>) -> Self {
        Self::styled_opt(value.into(), Some(style.into()))
    }

    pub(crate) fn styled_opt(value: Self, style: Option<String>) -> Self {
        let mut node = Self {
            children: Vec::new(),
            style,
            normalized: false,
        };
        if value.style.is_none() {
            node.children = value.children;
        } else if !value.children.is_empty() {
            node.children.push(Segment::Styled(value));
        }
        node
    }

    /// The style name of this node, if it has one.
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// The child segments of this node.
    pub fn children(&self) -> &[Segment] {
        &self.children
    }

    /// Returns `true` if the normalization invariants are known to hold.
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// The length of the plain text projection, in bytes.
    pub fn len(&self) -> usize {
        self.children.iter().map(Segment::len).sum()
    }

    /// Returns `true` if the string holds no text.
    pub fn is_empty(&self) -> bool {
        self.children.iter().all(Segment::is_empty)
    }

    /// The number of characters in the plain text projection.
    pub fn char_count(&self) -> usize {
        self.children.iter().map(Segment::char_count).sum()
    }

    /// Restores the normalization invariants in place.
    ///
    /// Adjacent text runs are merged, adjacent children with equal styles
    /// are spliced together, empty children are dropped, and a style-less
    /// node with a single styled child takes over that child's style. The
    /// plain text projection and the style context of every character are
    /// unchanged. Normalizing an already normalized string is a no-op.
    pub fn normalize(&mut self) {
        if self.normalized {
            return;
        }
        let mut merged: Vec<Segment> = Vec::with_capacity(self.children.len());
        let mut remerged = false;
        for child in std::mem::take(&mut self.children) {
            match child {
                Segment::Text(text) => {
                    if text.is_empty() {
                        continue;
                    }
                    if let Some(Segment::Text(last)) = merged.last_mut() {
                        last.push_str(&text);
                    } else {
                        merged.push(Segment::Text(text));
                    }
                }
                Segment::Styled(mut nested) => {
                    nested.normalize();
                    if nested.children.is_empty() {
                        continue;
                    }
                    match merged.last_mut() {
                        Some(Segment::Styled(last)) if last.style == nested.style => {
                            last.children.append(&mut nested.children);
                            last.normalized = false;
                            remerged = true;
                        }
                        _ => merged.push(Segment::Styled(nested)),
                    }
                }
            }
        }
        if remerged {
            // Splicing children into a merged sibling can expose further
            // merges one level down.
            for child in &mut merged {
                if let Segment::Styled(nested) = child {
                    nested.normalize();
                }
            }
        }
        self.children = merged;

        // A style-less wrapper around a single styled child is the child.
        while self.style.is_none() {
            match self.children.as_slice() {
                [Segment::Styled(_)] => {
                    let Some(Segment::Styled(inner)) = self.children.pop() else {
                        break;
                    };
                    self.style = inner.style;
                    self.children = inner.children;
                }
                _ => break,
            }
        }

        self.normalized = true;
    }

    pub(crate) fn normalized_view(&self) -> Cow<'_, Self> {
        if self.normalized {
            Cow::Borrowed(self)
        } else {
            let mut normalized = self.clone();
            normalized.normalize();
            Cow::Owned(normalized)
        }
    }

    /// The plain text of the string, with all styles discarded.
    pub fn plain(&self) -> String {
        let mut out = String::with_capacity(self.len());
        self.write_plain(&mut out);
        out
    }

    fn write_plain(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Segment::Text(text) => out.push_str(text),
                Segment::Styled(nested) => nested.write_plain(out),
            }
        }
    }

    /// Flattens the string into `(text, context)` runs.
    ///
    /// Each run's context is the dot-joined chain of style names enclosing
    /// it, outermost first; an unstyled run has an empty context. Adjacent
    /// runs with equal contexts are coalesced, so the output is the same
    /// whether or not the string is normalized.
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut runs = Vec::new();
        let mut context = Vec::new();
        self.flatten_into(&mut context, &mut runs);
        runs
    }

    fn flatten_into<'a>(&'a self, context: &mut Vec<&'a str>, runs: &mut Vec<(String, String)>) {
        if let Some(style) = &self.style {
            context.push(style);
        }
        let label = context.join(".");
        for child in &self.children {
            match child {
                Segment::Text(text) => {
                    if text.is_empty() {
                        continue;
                    }
                    match runs.last_mut() {
                        Some((run, run_label)) if *run_label == label => run.push_str(text),
                        _ => runs.push((text.clone(), label.clone())),
                    }
                }
                Segment::Styled(nested) => nested.flatten_into(context, runs),
            }
        }
        if self.style.is_some() {
            context.pop();
        }
    }

    /// Renders the string through `markup`, resolving each run's properties
    /// against `sheet`.
    ///
    /// Markup is emitted only at style transitions, so consecutive runs that
    /// resolve to the same properties share one span.
    pub fn render<M: Markup>(&self, sheet: &StyleSheet, markup: M) -> String {
        let mut rendition = Rendition::new(markup);
        let mut out = rendition.start();
        for (text, context) in self.flatten() {
            let properties = sheet.matched_properties(&context);
            for part in rendition.render_run(Some(&text), &properties) {
                out.push_str(&part);
            }
        }
        for part in rendition.end() {
            out.push_str(&part);
        }
        out
    }

    /// Concatenates in style-aware fashion.
    ///
    /// Equal root styles splice their children under one node; differing
    /// roots become siblings under a new style-less node.
    fn concat(mut self, other: Self) -> Self {
        if self.style == other.style {
            self.children.extend(other.children);
            self.normalized = false;
            return self;
        }
        let mut joined = Self::new();
        joined.normalized = false;
        if self.style.is_none() {
            joined.children = self.children;
        } else if !self.children.is_empty() {
            joined.children.push(Segment::Styled(self));
        }
        if other.style.is_none() {
            joined.children.extend(other.children);
        } else if !other.children.is_empty() {
            joined.children.push(Segment::Styled(other));
        }
        joined
    }

    /// Repeats the string `count` times, preserving the root style.
    ///
    /// A count of zero yields an empty string that keeps the root style.
    pub fn repeat(&self, count: usize) -> Self {
        if count == 0 {
            return Self {
                children: Vec::new(),
                style: self.style.clone(),
                normalized: true,
            };
        }
        if count == 1 {
            return self.clone();
        }
        if let [Segment::Text(text)] = self.children.as_slice() {
            return Self {
                children: vec![Segment::Text(text.repeat(count))],
                style: self.style.clone(),
                normalized: true,
            };
        }
        let mut repeated = Self {
            children: Vec::with_capacity(self.children.len() * count),
            style: self.style.clone(),
            normalized: false,
        };
        for _ in 0..count {
            repeated.children.extend(self.children.iter().cloned());
        }
        repeated
    }

    /// Returns `true` if byte `index` falls on a character boundary of the
    /// plain text projection. The end of the string is a boundary.
    pub fn is_char_boundary(&self, index: usize) -> bool {
        if index == 0 {
            return true;
        }
        let mut offset = 0;
        for child in &self.children {
            let child_len = child.len();
            if index < offset + child_len {
                return match child {
                    Segment::Text(text) => text.is_char_boundary(index - offset),
                    Segment::Styled(nested) => nested.is_char_boundary(index - offset),
                };
            }
            offset += child_len;
        }
        true
    }

    /// Takes the sub-string covering byte `range`, preserving the style
    /// spans of every character kept.
    ///
    /// The result keeps the root style even when empty. Out-of-range bounds
    /// clamp to the string length; a reversed range yields an empty string.
    ///
    /// # Errors
    ///
    /// [`Error::NotOnCharBoundary`] if either bound falls inside a
    /// character.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Result<Self, Error> {
        let len = self.len();
        let from = match range.start_bound() {
            Bound::Included(&n) => n,
            Bound::Excluded(&n) => n.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let to = match range.end_bound() {
            Bound::Included(&n) => n.saturating_add(1),
            Bound::Excluded(&n) => n,
            Bound::Unbounded => len,
        };
        let from = from.min(len);
        let to = to.min(len);
        if !self.is_char_boundary(from) {
            return Err(Error::NotOnCharBoundary { index: from });
        }
        if !self.is_char_boundary(to) {
            return Err(Error::NotOnCharBoundary { index: to });
        }
        Ok(self.slice_bytes(from, to))
    }

    /// As [`slice`](Self::slice), for callers with a step in hand.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedSliceStep`] for any step other than one, plus
    /// everything [`slice`](Self::slice) reports.
    pub fn slice_with_step(
        &self,
        range: impl RangeBounds<usize>,
        step: usize,
    ) -> Result<Self, Error> {
        if step != 1 {
            return Err(Error::UnsupportedSliceStep { step });
        }
        self.slice(range)
    }

    /// Takes the single character at byte `index` with its style spans.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] past the end of the string, and
    /// [`Error::NotOnCharBoundary`] inside a character.
    pub fn char_at(&self, index: usize) -> Result<Self, Error> {
        let len = self.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        if !self.is_char_boundary(index) {
            return Err(Error::NotOnCharBoundary { index });
        }
        let mut end = index + 1;
        while end < len && !self.is_char_boundary(end) {
            end += 1;
        }
        Ok(self.slice_bytes(index, end))
    }

    /// Slices on byte offsets already known to be clamped character
    /// boundaries.
    pub(crate) fn slice_bytes(&self, from: usize, to: usize) -> Self {
        if from == 0 && to == self.len() {
            return self.clone();
        }
        let mut out = Self {
            children: Vec::new(),
            style: self.style.clone(),
            normalized: false,
        };
        if from >= to {
            out.normalized = true;
            return out;
        }
        let mut offset = 0;
        for child in &self.children {
            let child_len = child.len();
            if offset >= to {
                break;
            }
            let start = from.saturating_sub(offset);
            if start < child_len {
                let end = child_len.min(to - offset);
                if start < end {
                    match child {
                        Segment::Text(text) => {
                            out.children.push(Segment::Text(text[start..end].to_owned()));
                        }
                        Segment::Styled(nested) => {
                            let part = nested.slice_bytes(start, end);
                            if !part.children.is_empty() {
                                out.children.push(Segment::Styled(part));
                            }
                        }
                    }
                }
            }
            offset += child_len;
        }
        out
    }

    /// Joins `pieces` with this string as the separator.
    pub fn join<I>(&self, pieces: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Self>,
    {
        let mut out = Self::new();
        let mut first = true;
        for piece in pieces {
            if !first && !self.is_empty() {
                out += self.clone();
            }
            out += piece.into();
            first = false;
        }
        out
    }
}

impl Default for StyledString {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for StyledString {
    fn from(text: String) -> Self {
        let mut children = Vec::new();
        if !text.is_empty() {
            children.push(Segment::Text(text));
        }
        Self {
            children,
            style: None,
            normalized: true,
        }
    }
}

impl From<&str> for StyledString {
    fn from(text: &str) -> Self {
        Self::from(text.to_owned())
    }
}

impl From<&String> for StyledString {
    fn from(text: &String) -> Self {
        Self::from(text.clone())
    }
}

impl From<char> for StyledString {
    fn from(c: char) -> Self {
        Self::from(String::from(c))
    }
}

impl Add for StyledString {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.concat(rhs)
    }
}

impl Add<&StyledString> for StyledString {
    type Output = Self;

    fn add(self, rhs: &Self) -> Self {
        self.concat(rhs.clone())
    }
}

impl Add<&str> for StyledString {
    type Output = Self;

    fn add(self, rhs: &str) -> Self {
        self.concat(Self::from(rhs))
    }
}

impl Add<String> for StyledString {
    type Output = Self;

    fn add(self, rhs: String) -> Self {
        self.concat(Self::from(rhs))
    }
}

impl Add<StyledString> for &str {
    type Output = StyledString;

    fn add(self, rhs: StyledString) -> StyledString {
        StyledString::from(self).concat(rhs)
    }
}

impl AddAssign for StyledString {
    fn add_assign(&mut self, rhs: Self) {
        if self.style == rhs.style {
            self.children.extend(rhs.children);
            self.normalized = false;
        } else {
            let lhs = std::mem::take(self);
            *self = lhs.concat(rhs);
        }
    }
}

impl AddAssign<&StyledString> for StyledString {
    fn add_assign(&mut self, rhs: &Self) {
        *self += rhs.clone();
    }
}

impl AddAssign<&str> for StyledString {
    fn add_assign(&mut self, rhs: &str) {
        *self += Self::from(rhs);
    }
}

/// Equality is structural on the normalized forms, so two strings are equal
/// when their text, styles and span boundaries agree, however the trees were
/// built.
impl PartialEq for StyledString {
    fn eq(&self, other: &Self) -> bool {
        let lhs = self.normalized_view();
        let rhs = other.normalized_view();
        lhs.style == rhs.style && lhs.children == rhs.children
    }
}

impl Eq for StyledString {}

/// An unstyled string compares equal to the plain string with the same
/// text; any root style makes the comparison false.
impl PartialEq<str> for StyledString {
    fn eq(&self, other: &str) -> bool {
        self.style.is_none() && self.plain() == other
    }
}

impl PartialEq<&str> for StyledString {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

impl PartialEq<String> for StyledString {
    fn eq(&self, other: &String) -> bool {
        *self == **other
    }
}

impl PartialEq<StyledString> for str {
    fn eq(&self, other: &StyledString) -> bool {
        *other == *self
    }
}

impl PartialEq<StyledString> for &str {
    fn eq(&self, other: &StyledString) -> bool {
        *other == **self
    }
}

impl PartialEq<StyledString> for String {
    fn eq(&self, other: &StyledString) -> bool {
        *other == **self
    }
}

/// Displays the plain text projection.
impl fmt::Display for StyledString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain())
    }
}
