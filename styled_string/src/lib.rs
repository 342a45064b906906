// Copyright 2025 the StyledStrings Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A string-like value type that keeps hierarchical style tags attached
//! through every operation.
//!
//! A [`StyledString`] is a tree: each node carries an optional style name
//! and a sequence of children, each either plain text or another styled
//! string. A run of text inherits the dot-joined chain of style names above
//! it, its *context*, and [`style_rules`] turns contexts into concrete
//! markup via CSS-like rules.
//!
//! The point of the type is that the familiar string operations all exist
//! here and all preserve spans: slicing, splitting, stripping, case mapping,
//! padding, searching, [`format`](StyledString::format)ting with styled
//! templates and arguments, and regex
//! [`substitute`](StyledString::substitute)-ion. Text keeps its styles
//! through whatever is done to it, and styles never change which plain text
//! an operation produces.
//!
//! ```
//! use styled_string::StyledString;
//!
//! let mut line = StyledString::styled("error", "severity");
//! line += ": disk on fire";
//!
//! // Spans follow the characters through slicing and splitting.
//! let (head, _, _) = line.partition(":");
//! assert_eq!(head, StyledString::styled("error", "severity"));
//! assert_eq!(line.plain(), "error: disk on fire");
//! ```
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod format;
mod search;
mod segment;
mod string;
mod substitute;
mod transform;

pub use crate::error::Error;
pub use crate::format::{FormatArgs, Formatter, Value};
pub use crate::segment::Segment;
pub use crate::string::StyledString;

pub use style_rules;

#[cfg(test)]
mod tests;
