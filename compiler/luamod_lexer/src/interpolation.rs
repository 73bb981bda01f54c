//! Expressions embedded in Luau backtick strings.
//!
//! A backtick string is a single [`String`](crate::TokenKind::String)
//! token, but each `{...}` segment inside it is ordinary code. Passes that
//! rename or count variable reads use [`names`] to see into those segments
//! and [`rename_names`] to rewrite them.

use std::ops::Range;

use crate::{prev_significant, tokenize, TokenKind};

/// Byte ranges of the `{...}` expression bodies in `text`, the source of a
/// backtick string. Empty for any other literal.
pub fn segments(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    if bytes.first() != Some(&b'`') {
        return out;
    }
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => break,
            b'{' => {
                let start = i + 1;
                let Some(end) = expression_end(bytes, start) else {
                    break;
                };
                out.push(start..end);
                i = end + 1;
            }
            _ => i += 1,
        }
    }
    out
}

/// Index of the `}` that closes the expression starting at `start`.
fn expression_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' if depth == 0 => return Some(i),
            b'}' => depth -= 1,
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Byte ranges, within `text`, of the variable names read by its
/// interpolated expressions, in source order. Names after `.` or `:` are
/// fields and are left out; nested backtick strings are searched too.
pub fn names(text: &str) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    for segment in segments(text) {
        let tokens = tokenize(&text[segment.clone()]);
        let mut offset = segment.start;
        for (i, token) in tokens.iter().enumerate() {
            let len = token.text.len();
            match token.kind {
                TokenKind::Identifier => {
                    let is_field = prev_significant(&tokens, i)
                        .is_some_and(|p| tokens[p].is_symbol(".") || tokens[p].is_symbol(":"));
                    if !is_field {
                        out.push(offset..offset + len);
                    }
                }
                TokenKind::String => {
                    out.extend(names(&token.text).into_iter().map(|r| r.start + offset..r.end + offset));
                }
                _ => {}
            }
            offset += len;
        }
    }
    out
}

/// `text` with every interpolated name for which `rename` returns a new
/// spelling replaced by it. `None` when nothing changes.
pub fn rename_names<'n>(text: &str, mut rename: impl FnMut(&str) -> Option<&'n str>) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for range in names(text) {
        if let Some(new) = rename(&text[range.clone()]) {
            out.push_str(&text[copied..range.start]);
            out.push_str(new);
            copied = range.end;
        }
    }
    if copied == 0 {
        return None;
    }
    out.push_str(&text[copied..]);
    Some(out)
}

#[cfg(test)]
mod tests;
