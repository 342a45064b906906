// Copyright 2025 the StyledStrings Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors reported by styled string operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A character index referred to a position past the end of the string.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The byte length of the string.
        len: usize,
    },

    /// Slicing was requested with a step other than one.
    #[error("slice step {step} is not supported")]
    UnsupportedSliceStep {
        /// The requested step.
        step: usize,
    },

    /// A byte index did not fall on a UTF-8 character boundary.
    #[error("byte index {index} is not on a character boundary")]
    NotOnCharBoundary {
        /// The offending index.
        index: usize,
    },

    /// [`index_of`](crate::StyledString::index_of) or
    /// [`rindex_of`](crate::StyledString::rindex_of) found no occurrence.
    #[error("substring not found")]
    SubstringNotFound,

    /// A format field used an unknown `!conversion`.
    #[error("unknown conversion specifier {conversion:?}")]
    UnknownConversion {
        /// The conversion character.
        conversion: char,
    },

    /// A format string switched between automatic and manual field numbering.
    #[error("cannot switch from automatic field numbering to manual field specification")]
    FieldNumberingConflict,

    /// A format field referred to an argument, key or attribute that does
    /// not exist.
    #[error("format field {field:?} not found")]
    FieldNotFound {
        /// The field reference as written in the format string.
        field: String,
    },

    /// A format string or format spec was malformed.
    #[error("bad format string: {message}")]
    BadFormatString {
        /// What was wrong with it.
        message: String,
    },

    /// A substitution replacement used an escape sequence that is not
    /// supported.
    #[error("escape sequence '\\{escape}' is not supported in replacements")]
    UnsupportedEscape {
        /// The character following the backslash.
        escape: char,
    },

    /// A substitution replacement referred to a capture group that does not
    /// exist or did not participate in the match.
    #[error("unknown or unmatched capture group {group:?}")]
    UnknownGroup {
        /// The group reference as written in the replacement.
        group: String,
    },
}
