// Copyright 2025 the StyledStrings Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style-preserving regular expression substitution.
//!
//! Replacement strings use backslash escapes: `\n`, `\t` and friends for
//! control characters, `\1` or `\g<name>` for capture group backreferences.
//! Text a group matched keeps the styles it had in the subject; literal
//! replacement text takes the style in effect at the start of the match.

use regex::{Captures, Match, Regex};

use crate::{Error, Segment, StyledString};

impl StyledString {
    /// Replaces matches of `pattern` with `replacement`, preserving styles.
    ///
    /// At most `count` matches are replaced; a count of zero replaces them
    /// all. Group backreferences splice the matched text out of the subject
    /// with its spans intact.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedEscape`] for escapes the replacement language
    /// does not support, and [`Error::UnknownGroup`] for backreferences to
    /// groups that do not exist or did not participate in the match.
    pub fn substitute(
        &self,
        pattern: &Regex,
        replacement: &str,
        count: usize,
    ) -> Result<Self, Error> {
        let tokens = parse_replacement(replacement)?;
        let mut subject = self.clone();
        subject.normalize();
        let plain = subject.plain();

        if matches!(subject.children.as_slice(), [] | [Segment::Text(_)]) {
            // A single unstyled run; no spans to carry through.
            let replaced = Self::from(substitute_plain(&plain, pattern, &tokens, count)?);
            return Ok(Self::styled_opt(replaced, subject.style.clone()));
        }

        let mut out = Self::new();
        let mut last = 0;
        let mut done = 0;
        for caps in pattern.captures_iter(&plain) {
            if count != 0 && done == count {
                break;
            }
            let Some(whole) = caps.get(0) else { continue };
            if last < whole.start() {
                out += subject.slice_bytes(last, whole.start());
            }
            // A zero-width match has no text of its own to take a style
            // from; use the character before it.
            let mut probe = if whole.is_empty() {
                whole.start().saturating_sub(1)
            } else {
                whole.start()
            };
            for token in &tokens {
                match token {
                    Token::Literal(text) => out += subject.styled_run_at(probe, text),
                    Token::Group(group) => {
                        let matched = resolve_group(&caps, group)?;
                        out += subject.slice_bytes(matched.start(), matched.end());
                        if caps.len() > 2 {
                            // With several groups in play, later literal
                            // text reads its style after the group it
                            // follows rather than at the match start.
                            probe = matched.end();
                        }
                    }
                }
            }
            last = whole.end();
            done += 1;
        }
        if last < plain.len() {
            out += subject.slice_bytes(last, plain.len());
        }
        Ok(out)
    }

    /// Rebuilds the chain of styles in effect at byte `offset`, wrapped
    /// around `text`. Past the end of the string only the root style
    /// applies.
    fn styled_run_at(&self, offset: usize, text: &str) -> Self {
        let mut chain = Vec::new();
        self.collect_style_chain(offset, &mut chain);
        let mut out = Self::from(text);
        for style in chain.into_iter().rev() {
            out = Self::styled_opt(out, style);
        }
        out
    }

    fn collect_style_chain(&self, offset: usize, chain: &mut Vec<Option<String>>) {
        chain.push(self.style.clone());
        let mut position = 0;
        for child in &self.children {
            let child_len = child.len();
            if offset < position + child_len {
                if let Segment::Styled(nested) = child {
                    nested.collect_style_chain(offset - position, chain);
                }
                return;
            }
            position += child_len;
        }
    }
}

enum Token {
    Literal(String),
    Group(GroupRef),
}

enum GroupRef {
    Index(usize),
    Name(String),
}

fn substitute_plain(
    plain: &str,
    pattern: &Regex,
    tokens: &[Token],
    count: usize,
) -> Result<String, Error> {
    let mut out = String::with_capacity(plain.len());
    let mut last = 0;
    let mut done = 0;
    for caps in pattern.captures_iter(plain) {
        if count != 0 && done == count {
            break;
        }
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&plain[last..whole.start()]);
        for token in tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Group(group) => out.push_str(resolve_group(&caps, group)?.as_str()),
            }
        }
        last = whole.end();
        done += 1;
    }
    out.push_str(&plain[last..]);
    Ok(out)
}

fn resolve_group<'t>(caps: &Captures<'t>, group: &GroupRef) -> Result<Match<'t>, Error> {
    let matched = match group {
        GroupRef::Index(index) => caps.get(*index),
        GroupRef::Name(name) => caps.name(name),
    };
    matched.ok_or_else(|| Error::UnknownGroup {
        group: match group {
            GroupRef::Index(index) => index.to_string(),
            GroupRef::Name(name) => name.clone(),
        },
    })
}

/// Tokenizes a replacement string into literal runs and group references.
fn parse_replacement(replacement: &str) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = replacement;
    loop {
        let Some(pos) = rest.find('\\') else {
            break;
        };
        literal.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        let mut chars = tail.chars();
        let Some(escape) = chars.next() else {
            // A trailing lone backslash is dropped.
            rest = "";
            break;
        };
        let mut after = chars.as_str();
        match escape {
            '\\' => literal.push('\\'),
            '\'' => literal.push('\''),
            '"' => literal.push('"'),
            'a' => literal.push('\x07'),
            'b' => literal.push('\x08'),
            'f' => literal.push('\x0c'),
            'n' => literal.push('\n'),
            'r' => literal.push('\r'),
            't' => literal.push('\t'),
            'v' => literal.push('\x0b'),
            // Line continuation.
            '\n' => {}
            '0'..='9' => {
                let end = after
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(after.len());
                let mut digits = String::from(escape);
                digits.push_str(&after[..end]);
                after = &after[end..];
                let index: usize = digits.parse().map_err(|_| Error::UnknownGroup {
                    group: digits.clone(),
                })?;
                flush_literal(&mut tokens, &mut literal);
                tokens.push(Token::Group(GroupRef::Index(index)));
            }
            'g' => {
                let Some(stripped) = after.strip_prefix('<') else {
                    return Err(Error::UnsupportedEscape { escape: 'g' });
                };
                let Some(end) = stripped.find('>') else {
                    return Err(Error::UnsupportedEscape { escape: 'g' });
                };
                let name = &stripped[..end];
                if name.is_empty() {
                    return Err(Error::UnsupportedEscape { escape: 'g' });
                }
                after = &stripped[end + 1..];
                flush_literal(&mut tokens, &mut literal);
                if name.bytes().all(|b| b.is_ascii_digit()) {
                    let index: usize = name.parse().map_err(|_| Error::UnknownGroup {
                        group: name.to_owned(),
                    })?;
                    tokens.push(Token::Group(GroupRef::Index(index)));
                } else {
                    tokens.push(Token::Group(GroupRef::Name(name.to_owned())));
                }
            }
            other => return Err(Error::UnsupportedEscape { escape: other }),
        }
        rest = after;
    }
    literal.push_str(rest);
    flush_literal(&mut tokens, &mut literal);
    Ok(tokens)
}

fn flush_literal(tokens: &mut Vec<Token>, literal: &mut String) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
}
