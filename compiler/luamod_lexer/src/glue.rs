//! Token adjacency rules.
//!
//! Compact serialization and formatting both need to know when two tokens
//! printed back to back would be read differently by the scanner. The rule
//! set here is the single answer to that question.

use crate::names::NameTables;
use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};

/// `true` when `left` immediately followed by `right` needs a separating
/// space to keep both tokens intact.
///
/// `left` must not be a line comment; nothing placed after one on the same
/// line survives.
pub fn needs_separator(left: &Token<'_>, right: &Token<'_>) -> bool {
    if left.kind.is_word() && right.kind.is_word() {
        return true;
    }
    if (is_concat(left) && is_number_or_ident(right))
        || (is_number_or_ident(left) && is_concat(right))
    {
        return true;
    }
    if left.text.ends_with('-') && right.text.starts_with('-') {
        return true;
    }
    would_merge(&left.text, &right.text)
}

fn is_concat(token: &Token<'_>) -> bool {
    token.kind == TokenKind::Operator && token.text == ".."
}

fn is_number_or_ident(token: &Token<'_>) -> bool {
    matches!(token.kind, TokenKind::Number | TokenKind::Identifier)
}

/// Re-scan `left` + `right` and check that the first two tokens are still
/// exactly `left` and `right`.
fn would_merge(left: &str, right: &str) -> bool {
    if left.is_empty() || right.is_empty() {
        return false;
    }
    let mut joined = String::with_capacity(left.len() + right.len());
    joined.push_str(left);
    joined.push_str(right);
    let mut scanner = Scanner::new(&joined, NameTables::lua());
    let first = scanner.next();
    let second = scanner.next();
    !matches!(
        (first, second),
        (Some(a), Some(b)) if a.text == left && b.text == right
    )
}
