// Copyright 2025 the StyledStrings Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style-preserving formatting.
//!
//! Format strings use brace fields with the usual shape
//! `{name!conversion:spec}`. Two things set this interpreter apart from the
//! compile-time formatting machinery: format strings, arguments and specs
//! are all runtime values, and both the template and the arguments may be
//! styled. Literal template text and styled argument values keep their
//! styles through padding, truncation and alignment.
//!
//! A spec may carry a leading extension of the form
//! `(value_style,whole_style)` naming a style for the formatted value and
//! one for the whole padded field:
//!
//! ```
//! use styled_string::{FormatArgs, StyledString};
//!
//! let template = StyledString::from("[{:(num)>6}]");
//! let out = template.format(&FormatArgs::new().arg(42)).unwrap();
//! assert_eq!(out.plain(), "[    42]");
//! // Only the digits carry the `num` style; the padding is unstyled.
//! ```

use std::collections::BTreeMap;

use crate::{Error, StyledString};

mod spec;

use spec::Spec;

/// How many levels of brace fields a format spec may itself contain.
const MAX_SPEC_RECURSION: usize = 2;

/// A formattable argument value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Text, possibly styled.
    Str(StyledString),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A boolean.
    Bool(bool),
    /// A list, indexable with `{0[2]}` style fields.
    List(Vec<Value>),
    /// A map, accessible with `{0[key]}` or `{0.key}` style fields.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// The value as a styled string, the way an empty format field would
    /// show it.
    pub fn to_styled(&self) -> StyledString {
        match self {
            Self::Str(styled) => styled.clone(),
            Self::Int(value) => StyledString::from(value.to_string()),
            Self::Float(value) => StyledString::from(value.to_string()),
            Self::Bool(value) => StyledString::from(if *value { "true" } else { "false" }),
            Self::List(_) | Self::Map(_) => StyledString::from(self.repr()),
        }
    }

    /// A debug-ish rendering used by the `!r` and `!a` conversions.
    fn repr(&self) -> String {
        match self {
            Self::Str(styled) => format!("{:?}", styled.plain()),
            Self::Int(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Bool(value) => String::from(if *value { "true" } else { "false" }),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(Self::repr).collect();
                format!("[{}]", parts.join(", "))
            }
            Self::Map(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("{key:?}: {}", value.repr()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
        }
    }

    fn access(&self, accessor: &Accessor<'_>, field: &str) -> Result<&Self, Error> {
        let not_found = || Error::FieldNotFound {
            field: field.to_owned(),
        };
        match accessor {
            Accessor::Attr(name) => match self {
                Self::Map(entries) => entries.get(*name).ok_or_else(not_found),
                _ => Err(not_found()),
            },
            Accessor::Item(key) => match self {
                Self::List(items) => {
                    let index: usize = key.parse().map_err(|_| not_found())?;
                    items.get(index).ok_or_else(not_found)
                }
                Self::Map(entries) => entries.get(*key).ok_or_else(not_found),
                _ => Err(not_found()),
            },
        }
    }
}

impl From<StyledString> for Value {
    fn from(value: StyledString) -> Self {
        Self::Str(value)
    }
}

impl From<&StyledString> for Value {
    fn from(value: &StyledString) -> Self {
        Self::Str(value.clone())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(StyledString::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(StyledString::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Self::Map(value)
    }
}

/// The positional and named arguments for one formatting call.
#[derive(Clone, Debug, Default)]
pub struct FormatArgs {
    positional: Vec<Value>,
    named: BTreeMap<String, Value>,
}

impl FormatArgs {
    /// Creates an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Adds a named argument.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    fn lookup(&self, first: &str, auto: &mut AutoIndex, field: &str) -> Result<&Value, Error> {
        let not_found = || Error::FieldNotFound {
            field: field.to_owned(),
        };
        if first.is_empty() {
            match auto {
                AutoIndex::Manual => Err(Error::FieldNumberingConflict),
                AutoIndex::Auto(next) => {
                    let index = *next;
                    *next += 1;
                    self.positional.get(index).ok_or_else(not_found)
                }
            }
        } else if first.bytes().all(|b| b.is_ascii_digit()) {
            if matches!(auto, AutoIndex::Auto(used) if *used > 0) {
                return Err(Error::FieldNumberingConflict);
            }
            *auto = AutoIndex::Manual;
            let index: usize = first.parse().map_err(|_| Error::BadFormatString {
                message: format!("field index {first:?} out of range"),
            })?;
            self.positional.get(index).ok_or_else(not_found)
        } else {
            self.named.get(first).ok_or_else(not_found)
        }
    }
}

/// Automatic field numbering state. Explicit indices are allowed only
/// before the first automatic field has been consumed.
#[derive(Clone, Copy, Debug)]
enum AutoIndex {
    Auto(usize),
    Manual,
}

/// The style-preserving format interpreter.
#[derive(Clone, Copy, Debug, Default)]
pub struct Formatter;

impl Formatter {
    /// Creates a formatter.
    pub fn new() -> Self {
        Self
    }

    /// Formats `template` with `args`.
    ///
    /// Literal template text contributes unstyled runs; the whole result is
    /// wrapped in the template's root style.
    ///
    /// # Errors
    ///
    /// Malformed templates report [`Error::BadFormatString`], unresolvable
    /// fields [`Error::FieldNotFound`], and mixing `{}` with `{0}` style
    /// fields [`Error::FieldNumberingConflict`].
    pub fn format(&self, template: &StyledString, args: &FormatArgs) -> Result<StyledString, Error> {
        let mut auto = AutoIndex::Auto(0);
        self.vformat(template, args, MAX_SPEC_RECURSION, &mut auto)
    }

    fn vformat(
        &self,
        template: &StyledString,
        args: &FormatArgs,
        depth: usize,
        auto: &mut AutoIndex,
    ) -> Result<StyledString, Error> {
        let plain = template.plain();
        let mut result = StyledString::new();
        for piece in parse_template(&plain)? {
            match piece {
                Piece::Literal(text) => result += text.as_str(),
                Piece::Field {
                    name,
                    conversion,
                    spec,
                } => {
                    let (first, accessors) = parse_field_name(name)?;
                    let mut value = args.lookup(first, auto, name)?;
                    for accessor in &accessors {
                        value = value.access(accessor, name)?;
                    }
                    let value = convert(value, conversion)?;
                    let expanded;
                    let spec = if spec.contains('{') {
                        if depth == 0 {
                            return Err(Error::BadFormatString {
                                message: "max format spec recursion exceeded".to_owned(),
                            });
                        }
                        expanded = self
                            .vformat(&StyledString::from(spec), args, depth - 1, auto)?
                            .plain();
                        expanded.as_str()
                    } else {
                        spec
                    };
                    result += self.format_field(&value, spec)?;
                }
            }
        }
        Ok(StyledString::styled_opt(result, template.style.clone()))
    }

    /// Formats one field, honouring a leading `(value_style,whole_style)`
    /// extension on the spec.
    fn format_field(&self, value: &Value, spec: &str) -> Result<StyledString, Error> {
        let Some(rest) = spec.strip_prefix('(') else {
            return self.format_value(value, spec);
        };
        let Some(close) = rest.find(')') else {
            return Err(Error::BadFormatString {
                message: "unterminated style extension in format spec".to_owned(),
            });
        };
        let styles = &rest[..close];
        let native = &rest[close + 1..];
        let (value_style, whole_style) = match styles.split_once(',') {
            Some((value_style, whole_style)) => (value_style, whole_style),
            None => (styles, ""),
        };
        let mut result = if value_style.is_empty() {
            self.format_value(value, native)?
        } else if let Value::Str(styled) = value {
            let styled = StyledString::styled(styled.clone(), value_style);
            self.format_value(&Value::Str(styled), native)?
        } else {
            self.format_plain_styled(value, native, value_style)?
        };
        if !whole_style.is_empty() {
            result = StyledString::styled(result, whole_style);
        }
        Ok(result)
    }

    fn format_value(&self, value: &Value, spec: &str) -> Result<StyledString, Error> {
        match value {
            Value::Str(styled) => self.format_styled(styled, spec),
            other => {
                let parsed = Spec::parse(spec)?;
                Ok(StyledString::from(format_plain(other, &parsed)?))
            }
        }
    }

    /// Formats styled text by formatting a same-length marker template and
    /// splicing the styled value back in place of the marker, so padding
    /// and truncation never disturb the value's internal spans.
    fn format_styled(&self, value: &StyledString, spec: &str) -> Result<StyledString, Error> {
        if spec.is_empty() {
            return Ok(value.clone());
        }
        let parsed = Spec::parse(spec)?;
        let mut value = value.clone();
        value.normalize();
        let count = value.char_count();
        if count == 0 {
            let body = spec::format_str("", &parsed)?;
            return Ok(StyledString::styled_opt(
                StyledString::from(body),
                value.style.clone(),
            ));
        }
        let marker = match count {
            1 => String::from("T"),
            2 => String::from("ac"),
            n => {
                let mut marker = String::with_capacity(n);
                marker.push('a');
                for _ in 0..n - 2 {
                    marker.push('b');
                }
                marker.push('c');
                marker
            }
        };
        let formatted = spec::format_str(&marker, &parsed)?;
        if let Some(index) = formatted.find(&marker) {
            let left = &formatted[..index];
            let right = &formatted[index + marker.len()..];
            return Ok(StyledString::from(left) + value + right);
        }
        // Precision clipped the marker; splice the surviving leading or
        // trailing portion of the value.
        if count >= 2 {
            if let Some(index) = formatted.find('a') {
                let after = &formatted[index + 1..];
                let right = after.trim_start_matches('b');
                let middle = after.len() - right.len();
                let kept = take_chars(&value, middle + 1);
                return Ok(StyledString::from(&formatted[..index]) + kept + right);
            }
            if let Some(index) = formatted.rfind('c') {
                let before = &formatted[..index];
                let left = before.trim_end_matches('b');
                let middle = before.len() - left.len();
                let kept = take_last_chars(&value, middle + 1);
                return Ok(StyledString::from(left) + kept + &formatted[index + 1..]);
            }
        }
        // Nothing of the value survived.
        Ok(StyledString::from(formatted))
    }

    /// Formats a non-string value and wraps its digits in `style`, leaving
    /// alignment padding outside the styled span. '=' alignment pads inside
    /// the number, so there the whole field is styled.
    fn format_plain_styled(
        &self,
        value: &Value,
        spec: &str,
        style: &str,
    ) -> Result<StyledString, Error> {
        let parsed = Spec::parse(spec)?;
        let formatted = format_plain(value, &parsed)?;
        if parsed.align == Some('=') {
            return Ok(StyledString::styled(formatted.as_str(), style));
        }
        let fill = parsed.fill;
        let mut start = 0;
        let mut end = formatted.len();
        if matches!(parsed.align, None | Some('>') | Some('^')) {
            start = formatted.len() - formatted.trim_start_matches(fill).len();
        }
        if matches!(parsed.align, None | Some('<') | Some('^')) {
            end = start + formatted[start..].trim_end_matches(fill).len();
        }
        let core = StyledString::styled(&formatted[start..end], style);
        Ok(StyledString::from(&formatted[..start]) + core + &formatted[end..])
    }
}

impl StyledString {
    /// Formats `self` as a template with `args`, preserving the styles of
    /// both the template and any styled arguments.
    ///
    /// # Errors
    ///
    /// As for [`Formatter::format`].
    pub fn format(&self, args: &FormatArgs) -> Result<Self, Error> {
        Formatter::new().format(self, args)
    }
}

fn format_plain(value: &Value, spec: &Spec) -> Result<String, Error> {
    match value {
        Value::Str(styled) => spec::format_str(&styled.plain(), spec),
        Value::Int(v) => spec::format_int(*v, spec),
        Value::Float(v) => spec::format_float(*v, spec),
        Value::Bool(v) => match spec.ty {
            Some('d' | 'b' | 'o' | 'x' | 'X' | 'c') => spec::format_int(i64::from(*v), spec),
            _ => spec::format_str(if *v { "true" } else { "false" }, spec),
        },
        Value::List(_) | Value::Map(_) => spec::format_str(&value.repr(), spec),
    }
}

fn convert(value: &Value, conversion: Option<char>) -> Result<Value, Error> {
    match conversion {
        None => Ok(value.clone()),
        Some('s') => Ok(Value::Str(value.to_styled())),
        Some('r') => Ok(Value::Str(StyledString::from(value.repr()))),
        Some('a') => Ok(Value::Str(StyledString::from(ascii_escape(&value.repr())))),
        Some(conversion) => Err(Error::UnknownConversion { conversion }),
    }
}

fn ascii_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            out.extend(c.escape_unicode());
        }
    }
    out
}

fn take_chars(value: &StyledString, count: usize) -> StyledString {
    let plain = value.plain();
    value.slice_bytes(0, byte_of_char(&plain, count))
}

fn take_last_chars(value: &StyledString, count: usize) -> StyledString {
    let plain = value.plain();
    let total = plain.chars().count();
    let start = byte_of_char(&plain, total.saturating_sub(count));
    value.slice_bytes(start, plain.len())
}

fn byte_of_char(plain: &str, index: usize) -> usize {
    plain
        .char_indices()
        .nth(index)
        .map_or(plain.len(), |(offset, _)| offset)
}

enum Piece<'a> {
    Literal(String),
    Field {
        name: &'a str,
        conversion: Option<char>,
        spec: &'a str,
    },
}

fn parse_template(plain: &str) -> Result<Vec<Piece<'_>>, Error> {
    let bytes = plain.as_bytes();
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut run = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b != b'{' && b != b'}' {
            i += 1;
            continue;
        }
        literal.push_str(&plain[run..i]);
        if bytes.get(i + 1) == Some(&b) {
            // {{ and }} are escaped braces.
            literal.push(b as char);
            i += 2;
            run = i;
            continue;
        }
        if b == b'}' {
            return Err(Error::BadFormatString {
                message: "single '}' encountered in format string".to_owned(),
            });
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(std::mem::take(&mut literal)));
        }
        let start = i + 1;
        let mut depth = 1usize;
        let mut j = start;
        while j < bytes.len() {
            match bytes[j] {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            j += 1;
        }
        if depth != 0 {
            return Err(Error::BadFormatString {
                message: "expected '}' before end of format string".to_owned(),
            });
        }
        let (name, conversion, spec) = split_field(&plain[start..j])?;
        pieces.push(Piece::Field {
            name,
            conversion,
            spec,
        });
        i = j + 1;
        run = i;
    }
    literal.push_str(&plain[run..]);
    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
    Ok(pieces)
}

/// Splits a brace field into name, `!conversion` and `:spec`. `!` and `:`
/// inside `[...]` indexing belong to the name.
fn split_field(field: &str) -> Result<(&str, Option<char>, &str), Error> {
    let bytes = field.as_bytes();
    let mut i = 0;
    let mut in_index = false;
    while i < bytes.len() {
        match bytes[i] {
            b'[' => in_index = true,
            b']' => in_index = false,
            b'!' | b':' if !in_index => break,
            _ => {}
        }
        i += 1;
    }
    let name = &field[..i];
    if i == bytes.len() {
        return Ok((name, None, ""));
    }
    if bytes[i] == b':' {
        return Ok((name, None, &field[i + 1..]));
    }
    let rest = &field[i + 1..];
    let mut chars = rest.chars();
    let Some(conversion) = chars.next() else {
        return Err(Error::BadFormatString {
            message: "end of string while looking for conversion specifier".to_owned(),
        });
    };
    let after = chars.as_str();
    if after.is_empty() {
        return Ok((name, Some(conversion), ""));
    }
    let Some(spec) = after.strip_prefix(':') else {
        return Err(Error::BadFormatString {
            message: "expected ':' after conversion specifier".to_owned(),
        });
    };
    Ok((name, Some(conversion), spec))
}

enum Accessor<'a> {
    Attr(&'a str),
    Item(&'a str),
}

fn parse_field_name(name: &str) -> Result<(&str, Vec<Accessor<'_>>), Error> {
    let bytes = name.as_bytes();
    let mut i = 0;
    while i < bytes.len() && bytes[i] != b'.' && bytes[i] != b'[' {
        i += 1;
    }
    let first = &name[..i];
    let mut accessors = Vec::new();
    while i < bytes.len() {
        match bytes[i] {
            b'.' => {
                let start = i + 1;
                let mut j = start;
                while j < bytes.len() && bytes[j] != b'.' && bytes[j] != b'[' {
                    j += 1;
                }
                if j == start {
                    return Err(Error::BadFormatString {
                        message: "empty attribute in format field".to_owned(),
                    });
                }
                accessors.push(Accessor::Attr(&name[start..j]));
                i = j;
            }
            b'[' => {
                let start = i + 1;
                let mut j = start;
                while j < bytes.len() && bytes[j] != b']' {
                    j += 1;
                }
                if j == bytes.len() {
                    return Err(Error::BadFormatString {
                        message: "missing ']' in format field".to_owned(),
                    });
                }
                accessors.push(Accessor::Item(&name[start..j]));
                i = j + 1;
            }
            _ => {
                return Err(Error::BadFormatString {
                    message: format!("invalid format field name {name:?}"),
                });
            }
        }
    }
    Ok((first, accessors))
}
