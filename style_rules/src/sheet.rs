// Copyright 2025 the StyledStrings Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::ops::AddAssign;

use crate::{Properties, Rule};

/// An ordered collection of [`Rule`]s.
///
/// Resolution is last-writer-wins over the rules that match a context,
/// applied in specificity order, so more specific rules overwrite the
/// properties of less specific ones.
#[derive(Clone, Debug, Default)]
pub struct StyleSheet {
    rules: Vec<Rule>,
}

impl StyleSheet {
    /// Creates an empty stylesheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule to the sheet.
    ///
    /// Insertion order does not affect resolution; rules are applied in
    /// specificity order regardless.
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// The rules in the sheet, in insertion order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The number of rules in the sheet.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the sheet holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolves the properties in effect for the dot-joined `context`.
    ///
    /// Every matching rule contributes its properties, least specific first,
    /// so the most specific rule wins each property it names.
    pub fn matched_properties(&self, context: &str) -> Properties {
        let mut matched: Vec<&Rule> = self
            .rules
            .iter()
            .filter(|rule| rule.matches(context))
            .collect();
        matched.sort();
        let mut properties = Properties::new();
        for rule in matched {
            properties.merge_from(rule.properties());
        }
        properties
    }
}

impl AddAssign<Rule> for StyleSheet {
    fn add_assign(&mut self, rule: Rule) {
        self.add_rule(rule);
    }
}

impl FromIterator<Rule> for StyleSheet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
