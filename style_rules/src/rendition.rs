// Copyright 2025 the StyledStrings Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::borrow::ToOwned;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::Properties;

/// The difference between two property sets, partitioned into additions,
/// removals and value changes. Each partition is sorted by property name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyDiff {
    /// Properties present in the new set only, with their new values.
    pub added: Vec<(String, Option<String>)>,
    /// Properties present in the old set only, with their old values.
    pub removed: Vec<(String, Option<String>)>,
    /// Properties present in both sets with differing values, as
    /// `(name, old value, new value)`.
    pub changed: Vec<(String, Option<String>, Option<String>)>,
}

impl PropertyDiff {
    /// Computes the diff that turns `old` into `new`.
    pub fn between(old: &Properties, new: &Properties) -> Self {
        let mut diff = Self::default();
        for (name, old_value) in old.iter() {
            match new.get(name) {
                None => diff
                    .removed
                    .push((name.to_owned(), old_value.map(str::to_owned))),
                Some(new_value) if new_value != old_value => diff.changed.push((
                    name.to_owned(),
                    old_value.map(str::to_owned),
                    new_value.map(str::to_owned),
                )),
                Some(_) => {}
            }
        }
        for (name, new_value) in new.iter() {
            if old.get(name).is_none() {
                diff.added
                    .push((name.to_owned(), new_value.map(str::to_owned)));
            }
        }
        diff
    }

    /// Returns `true` if the two property sets were equal.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Supplies the markup emitted around runs of rendered text.
///
/// Implementations provide at minimum the [`open`](Self::open) and
/// [`close`](Self::close) sequences for a single property. The two optional
/// hooks let a markup take over larger transitions wholesale, for example to
/// emit a single reset sequence instead of individual closes.
pub trait Markup {
    /// The sequence that begins a span of `property`.
    fn open(&self, property: &str, value: Option<&str>) -> String;

    /// The sequence that ends a span of `property`.
    fn close(&self, property: &str, value: Option<&str>) -> String;

    /// Renders an entire transition between property sets.
    ///
    /// Returning `Some` suppresses the default close/open expansion.
    fn transition(
        &self,
        old: &Properties,
        new: &Properties,
        diff: &PropertyDiff,
    ) -> Option<Vec<String>> {
        let _ = (old, new, diff);
        None
    }

    /// Renders only the value changes of a transition.
    ///
    /// Returning `Some` suppresses the default treatment of a change as a
    /// close of the old value followed by an open of the new one.
    fn change(&self, changed: &[(String, Option<String>, Option<String>)]) -> Option<Vec<String>> {
        let _ = changed;
        None
    }
}

/// A stateful rendering pass that emits minimal markup between runs.
///
/// The rendition tracks the property set currently in effect. Each run it is
/// handed produces only the markup for the difference from the previous run:
/// removed properties are closed in reverse name order, then added
/// properties are opened in name order, so a transition's own closes and
/// opens nest.
#[derive(Debug)]
pub struct Rendition<M: Markup> {
    markup: M,
    active: Properties,
}

impl<M: Markup> Rendition<M> {
    /// Creates a rendition that starts with no properties in effect.
    pub fn new(markup: M) -> Self {
        Self {
            markup,
            active: Properties::new(),
        }
    }

    /// The property set currently in effect.
    pub fn active_properties(&self) -> &Properties {
        &self.active
    }

    /// Resets the rendition to its initial state and returns any markup the
    /// output should begin with.
    pub fn start(&mut self) -> String {
        self.active = Properties::new();
        String::new()
    }

    /// Renders one run of text under `properties`, preceded by the markup
    /// for the transition from the previous run.
    pub fn render_run(&mut self, text: Option<&str>, properties: &Properties) -> Vec<String> {
        let diff = PropertyDiff::between(&self.active, properties);
        let mut parts = Vec::new();
        if !diff.is_empty() {
            match self.markup.transition(&self.active, properties, &diff) {
                Some(rendered) => parts.extend(rendered),
                None => self.render_transition(&diff, &mut parts),
            }
        }
        if let Some(text) = text {
            parts.push(text.to_owned());
        }
        self.active = properties.clone();
        parts
    }

    /// Closes every open property and returns the trailing markup.
    pub fn end(&mut self) -> Vec<String> {
        self.render_run(None, &Properties::new())
    }

    fn render_transition(&self, diff: &PropertyDiff, parts: &mut Vec<String>) {
        let mut removed = diff.removed.clone();
        let mut added = diff.added.clone();
        if !diff.changed.is_empty() {
            match self.markup.change(&diff.changed) {
                Some(rendered) => parts.extend(rendered),
                None => {
                    for (name, old_value, new_value) in &diff.changed {
                        removed.push((name.clone(), old_value.clone()));
                        added.push((name.clone(), new_value.clone()));
                    }
                    removed.sort();
                    added.sort();
                }
            }
        }
        for (name, value) in removed.iter().rev() {
            parts.push(self.markup.close(name, value.as_deref()));
        }
        for (name, value) in &added {
            parts.push(self.markup.open(name, value.as_deref()));
        }
    }
}

/// The open and close templates for one property.
///
/// Templates may contain `%p`, replaced with the property name, and `%v`,
/// replaced with its value. When a property has no value the flag forms are
/// used if present, otherwise `%v` expands to the empty string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expansion {
    open: String,
    close: String,
    open_flag: Option<String>,
    close_flag: Option<String>,
}

impl Expansion {
    /// Creates an expansion from its open and close templates.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
            open_flag: None,
            close_flag: None,
        }
    }

    /// Adds distinct templates for valueless flag properties.
    pub fn with_flag_forms(
        mut self,
        open: impl Into<String>,
        close: impl Into<String>,
    ) -> Self {
        self.open_flag = Some(open.into());
        self.close_flag = Some(close.into());
        self
    }

    fn expand_open(&self, property: &str, value: Option<&str>) -> String {
        match (value, &self.open_flag) {
            (None, Some(flag)) => expand(flag, property, None),
            _ => expand(&self.open, property, value),
        }
    }

    fn expand_close(&self, property: &str, value: Option<&str>) -> String {
        match (value, &self.close_flag) {
            (None, Some(flag)) => expand(flag, property, None),
            _ => expand(&self.close, property, value),
        }
    }
}

fn expand(template: &str, property: &str, value: Option<&str>) -> String {
    template
        .replace("%p", property)
        .replace("%v", value.unwrap_or(""))
}

/// A [`Markup`] driven by a per-property table of [`Expansion`]s.
///
/// Properties without an expansion fall back to the wildcard expansion if
/// one was supplied, and render nothing otherwise.
#[derive(Clone, Debug, Default)]
pub struct TagMarkup {
    expansions: BTreeMap<String, Expansion>,
    fallback: Option<Expansion>,
}

impl TagMarkup {
    /// Creates a markup with no expansions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the expansion for `property`.
    pub fn with_expansion(mut self, property: impl Into<String>, expansion: Expansion) -> Self {
        self.expansions.insert(property.into(), expansion);
        self
    }

    /// Registers the wildcard expansion used for unlisted properties.
    pub fn with_fallback(mut self, expansion: Expansion) -> Self {
        self.fallback = Some(expansion);
        self
    }

    fn expansion_for(&self, property: &str) -> Option<&Expansion> {
        self.expansions.get(property).or(self.fallback.as_ref())
    }
}

impl Markup for TagMarkup {
    fn open(&self, property: &str, value: Option<&str>) -> String {
        match self.expansion_for(property) {
            Some(expansion) => expansion.expand_open(property, value),
            None => String::new(),
        }
    }

    fn close(&self, property: &str, value: Option<&str>) -> String {
        match self.expansion_for(property) {
            Some(expansion) => expansion.expand_close(property, value),
            None => String::new(),
        }
    }
}

/// A [`Markup`] that emits no markup at all, yielding plain text output.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityMarkup;

impl Markup for IdentityMarkup {
    fn open(&self, _property: &str, _value: Option<&str>) -> String {
        String::new()
    }

    fn close(&self, _property: &str, _value: Option<&str>) -> String {
        String::new()
    }
}
