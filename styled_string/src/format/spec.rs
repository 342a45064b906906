// Copyright 2025 the StyledStrings Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The format spec mini-language: `[[fill]align][sign][#][0][width][.precision][type]`.
//!
//! Specs arrive as runtime strings, so they are interpreted here rather than
//! through the compile-time formatting machinery.

use crate::Error;

#[derive(Clone, Debug)]
pub(crate) struct Spec {
    pub(crate) fill: char,
    pub(crate) align: Option<char>,
    pub(crate) sign: Option<char>,
    pub(crate) alternate: bool,
    pub(crate) width: usize,
    pub(crate) precision: Option<usize>,
    pub(crate) ty: Option<char>,
}

impl Spec {
    pub(crate) fn parse(spec: &str) -> Result<Self, Error> {
        let chars: Vec<char> = spec.chars().collect();
        let mut out = Self {
            fill: ' ',
            align: None,
            sign: None,
            alternate: false,
            width: 0,
            precision: None,
            ty: None,
        };
        let is_align = |c: char| matches!(c, '<' | '>' | '^' | '=');
        let mut i = 0;
        if chars.len() >= 2 && is_align(chars[1]) {
            out.fill = chars[0];
            out.align = Some(chars[1]);
            i = 2;
        } else if !chars.is_empty() && is_align(chars[0]) {
            out.align = Some(chars[0]);
            i = 1;
        }
        if i < chars.len() && matches!(chars[i], '+' | '-' | ' ') {
            out.sign = Some(chars[i]);
            i += 1;
        }
        if i < chars.len() && chars[i] == '#' {
            out.alternate = true;
            i += 1;
        }
        if i < chars.len() && chars[i] == '0' {
            // The zero flag is shorthand for fill '0' with '=' alignment.
            if out.align.is_none() {
                out.align = Some('=');
                out.fill = '0';
            }
            i += 1;
        }
        while i < chars.len() && chars[i].is_ascii_digit() {
            let digit = chars[i] as usize - '0' as usize;
            out.width = out
                .width
                .checked_mul(10)
                .and_then(|w| w.checked_add(digit))
                .ok_or_else(|| bad("width out of range"))?;
            i += 1;
        }
        if i < chars.len() && chars[i] == '.' {
            i += 1;
            let mut precision = 0usize;
            let mut any = false;
            while i < chars.len() && chars[i].is_ascii_digit() {
                let digit = chars[i] as usize - '0' as usize;
                precision = precision
                    .checked_mul(10)
                    .and_then(|p| p.checked_add(digit))
                    .ok_or_else(|| bad("precision out of range"))?;
                i += 1;
                any = true;
            }
            if !any {
                return Err(bad("format specifier missing precision"));
            }
            out.precision = Some(precision);
        }
        match chars.len() - i {
            0 => {}
            1 => out.ty = Some(chars[i]),
            _ => return Err(bad(&format!("invalid format specifier {spec:?}"))),
        }
        Ok(out)
    }
}

fn bad(message: &str) -> Error {
    Error::BadFormatString {
        message: message.to_owned(),
    }
}

/// Formats string-typed content: precision truncates, width pads, default
/// alignment is to the left.
pub(crate) fn format_str(text: &str, spec: &Spec) -> Result<String, Error> {
    if let Some(ty) = spec.ty {
        if ty != 's' {
            return Err(bad(&format!("unknown format code {ty:?} for string")));
        }
    }
    if spec.sign.is_some() {
        return Err(bad("sign not allowed in string format specifier"));
    }
    if spec.align == Some('=') {
        return Err(bad("'=' alignment not allowed in string format specifier"));
    }
    let truncated: String = match spec.precision {
        Some(precision) => text.chars().take(precision).collect(),
        None => text.to_owned(),
    };
    Ok(pad_body("", "", &truncated, spec, '<'))
}

pub(crate) fn format_int(value: i64, spec: &Spec) -> Result<String, Error> {
    if spec.precision.is_some() {
        return Err(bad("precision not allowed in integer format specifier"));
    }
    let ty = spec.ty.unwrap_or('d');
    if ty == 'c' {
        let code = u32::try_from(value)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| bad("character code out of range"))?;
        return Ok(pad_body("", "", &String::from(code), spec, '>'));
    }
    let magnitude = value.unsigned_abs();
    let (digits, prefix) = match ty {
        'd' => (magnitude.to_string(), ""),
        'b' => (format!("{magnitude:b}"), if spec.alternate { "0b" } else { "" }),
        'o' => (format!("{magnitude:o}"), if spec.alternate { "0o" } else { "" }),
        'x' => (format!("{magnitude:x}"), if spec.alternate { "0x" } else { "" }),
        'X' => (format!("{magnitude:X}"), if spec.alternate { "0X" } else { "" }),
        other => return Err(bad(&format!("unknown format code {other:?} for integer"))),
    };
    let sign = sign_str(value < 0, spec);
    Ok(pad_body(sign, prefix, &digits, spec, '>'))
}

pub(crate) fn format_float(value: f64, spec: &Spec) -> Result<String, Error> {
    let negative = value.is_sign_negative() && !value.is_nan();
    let magnitude = value.abs();
    let body = if !magnitude.is_finite() {
        let text = if magnitude.is_nan() { "nan" } else { "inf" };
        if matches!(spec.ty, Some('E' | 'F')) {
            text.to_uppercase()
        } else {
            text.to_owned()
        }
    } else {
        match spec.ty {
            None => match spec.precision {
                Some(precision) => format!("{:.*}", precision, magnitude),
                None => magnitude.to_string(),
            },
            Some('f') => format!("{:.*}", spec.precision.unwrap_or(6), magnitude),
            Some('F') => format!("{:.*}", spec.precision.unwrap_or(6), magnitude),
            Some(e @ ('e' | 'E')) => {
                exponent_form(magnitude, spec.precision.unwrap_or(6), e == 'E')
            }
            Some('%') => format!("{:.*}%", spec.precision.unwrap_or(6), magnitude * 100.0),
            Some(other) => return Err(bad(&format!("unknown format code {other:?} for float"))),
        }
    };
    let sign = sign_str(negative, spec);
    Ok(pad_body(sign, "", &body, spec, '>'))
}

fn sign_str(negative: bool, spec: &Spec) -> &'static str {
    if negative {
        "-"
    } else {
        match spec.sign {
            Some('+') => "+",
            Some(' ') => " ",
            _ => "",
        }
    }
}

/// Pads `sign`+`prefix`+`body` out to the spec width. With '=' alignment the
/// fill goes between the prefix and the body, so zero padding lands inside
/// the sign.
fn pad_body(sign: &str, prefix: &str, body: &str, spec: &Spec, default_align: char) -> String {
    let used = sign.chars().count() + prefix.chars().count() + body.chars().count();
    if used >= spec.width {
        return format!("{sign}{prefix}{body}");
    }
    let fill: String = String::from(spec.fill).repeat(spec.width - used);
    match spec.align.unwrap_or(default_align) {
        '<' => format!("{sign}{prefix}{body}{fill}"),
        '=' => format!("{sign}{prefix}{fill}{body}"),
        '^' => {
            let total = spec.width - used;
            let left: String = String::from(spec.fill).repeat(total / 2);
            let right: String = String::from(spec.fill).repeat(total - total / 2);
            format!("{left}{sign}{prefix}{body}{right}")
        }
        _ => format!("{fill}{sign}{prefix}{body}"),
    }
}

/// Rust renders exponents as `1.5e2`; reshape to the conventional `e+02`.
fn exponent_form(magnitude: f64, precision: usize, upper: bool) -> String {
    let rendered = format!("{:.*e}", precision, magnitude);
    match rendered.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ("-", digits),
                None => ("+", exponent),
            };
            let marker = if upper { 'E' } else { 'e' };
            if digits.len() < 2 {
                format!("{mantissa}{marker}{sign}0{digits}")
            } else {
                format!("{mantissa}{marker}{sign}{digits}")
            }
        }
        None => rendered,
    }
}
