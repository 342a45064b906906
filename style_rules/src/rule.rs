// Copyright 2025 the StyledStrings Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::cmp::Ordering;
use core::fmt;

use crate::Properties;

/// A selector rule binding a context pattern to style properties.
///
/// The pattern is a sequence of style names joined with `.`, matched against
/// the dot-joined context of a run of text. An *anchored* pattern such as
/// `message.detail` matches any context that starts with those segments. A
/// *floating* pattern begins with a `.` (for example `.detail`) and matches
/// its segments anywhere in the context.
///
/// Rules order by specificity: fewer segments sort first, and on equal
/// segment counts an anchored rule sorts before a floating one, so that when
/// rules are applied in order the floating rule's properties win.
#[derive(Clone)]
pub struct Rule {
    pattern: String,
    properties: Properties,
}

impl Rule {
    /// Creates a rule mapping `pattern` to `properties`.
    pub fn new(pattern: impl Into<String>, properties: Properties) -> Self {
        Self {
            pattern: pattern.into(),
            properties,
        }
    }

    /// The context pattern this rule selects on.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The properties applied when this rule matches.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Returns `true` if the pattern floats (matches anywhere in a context)
    /// rather than anchoring at the start.
    pub fn is_floating(&self) -> bool {
        self.pattern.starts_with('.')
    }

    /// The number of style-name segments in the pattern.
    pub fn segments(&self) -> usize {
        let count = self.pattern.split('.').count();
        if self.is_floating() {
            // The leading `.` produces an empty first segment.
            count - 1
        } else {
            count
        }
    }

    /// Returns `true` if this rule selects the dot-joined `context`.
    pub fn matches(&self, context: &str) -> bool {
        if let Some(stripped) = self.pattern.strip_prefix('.') {
            if let Some(rest) = context.strip_prefix(stripped) {
                // Matches at the start only on a segment boundary, so that
                // `.bold` does not select `boldest.x`.
                if rest.is_empty() || rest.starts_with('.') {
                    return true;
                }
            }
            // Mid-context matches need a trailing `.` for the same reason;
            // at the end of the context the pattern itself carries the
            // leading separator.
            let mut interior = String::with_capacity(self.pattern.len() + 1);
            interior.push_str(&self.pattern);
            interior.push('.');
            context.contains(interior.as_str()) || context.ends_with(self.pattern.as_str())
        } else {
            context.starts_with(self.pattern.as_str())
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("pattern", &self.pattern)
            .field("properties", &self.properties)
            .finish()
    }
}

/// Rules compare by pattern alone; two rules with the same pattern are the
/// same selector even when their properties differ.
impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for Rule {}

impl PartialOrd for Rule {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rule {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments()
            .cmp(&other.segments())
            // Anchored before floating, so floating properties overwrite.
            .then_with(|| self.is_floating().cmp(&other.is_floating()))
            .then_with(|| self.pattern.cmp(&other.pattern))
    }
}
