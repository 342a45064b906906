// Copyright 2025 the StyledStrings Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::StyledString;

/// One child of a [`StyledString`]: a bare run of text, or a nested styled
/// string carrying its own style tag.
#[derive(Clone, Debug, PartialEq)]
pub enum Segment {
    /// A leaf run of plain text.
    Text(String),
    /// A nested styled string.
    Styled(StyledString),
}

impl Segment {
    /// The length of this segment's plain text, in bytes.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Styled(nested) => nested.len(),
        }
    }

    /// Returns `true` if the segment holds no text.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn char_count(&self) -> usize {
        match self {
            Self::Text(text) => text.chars().count(),
            Self::Styled(nested) => nested.char_count(),
        }
    }
}
