// Copyright 2025 the StyledStrings Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selector rules, stylesheets and the rendition protocol for styled text.
//!
//! Styled text carries a hierarchy of style names; each run of text resolves
//! to a dot-joined *context* such as `message.detail.emphasis`. This crate
//! turns contexts into concrete rendering:
//!
//! - [`Rule`] selects contexts with an anchored or floating pattern and
//!   contributes a set of [`Properties`].
//! - [`StyleSheet`] holds rules and resolves the winning properties for a
//!   context, most specific rule last.
//! - [`Rendition`] walks a sequence of runs and emits minimal [`Markup`]
//!   transitions between them, so nothing is closed and reopened when
//!   consecutive runs share properties.
//!
//! ```
//! use style_rules::{Expansion, Properties, Rendition, Rule, StyleSheet, TagMarkup};
//!
//! let mut sheet = StyleSheet::new();
//! sheet += Rule::new("message", [("weight", "bold")].into_iter().collect());
//!
//! let markup = TagMarkup::new()
//!     .with_fallback(Expansion::new("<%p value='%v'>", "</%p>").with_flag_forms("<%p>", "</%p>"));
//! let mut rendition = Rendition::new(markup);
//!
//! let mut out = rendition.start();
//! for part in rendition.render_run(Some("hello"), &sheet.matched_properties("message")) {
//!     out.push_str(&part);
//! }
//! for part in rendition.end() {
//!     out.push_str(&part);
//! }
//! assert_eq!(out, "<weight value='bold'>hello</weight>");
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): This is currently unused and is provided for
//!   forward compatibility.
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
#![no_std]

extern crate alloc;

mod properties;
mod rendition;
mod rule;
mod sheet;

pub use crate::properties::Properties;
pub use crate::rendition::{Expansion, IdentityMarkup, Markup, PropertyDiff, Rendition, TagMarkup};
pub use crate::rule::Rule;
pub use crate::sheet::StyleSheet;
