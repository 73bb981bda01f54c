//! String concatenation merging.
//!
//! `"a" .. "b"` becomes `"ab"`, repeated until nothing changes or
//! [`MAX_ROUNDS`] is hit. A pair is only merged when neither literal is
//! bound tighter by a neighbouring operator: `x + "1" .. "2"` groups as
//! `(x + "1") .. "2"` and stays. `table.concat({...}[, sep])` over string
//! and integer literals folds to one literal.

use luamod_lexer::literal::{decode, render, Quote};
use luamod_lexer::{Token, TokenKind};

use crate::edit::{
    expect_symbol, follows_operand, has_postfix, library_call, matching_close, next_code, prev_code,
    rewrite, single, split_items,
};

/// Upper bound on merge rounds.
pub const MAX_ROUNDS: usize = 100;

pub fn apply<'src>(tokens: &[Token<'src>]) -> (Vec<Token<'src>>, usize) {
    let mut current = tokens.to_vec();
    let mut total = 0;
    for round in 0..MAX_ROUNDS {
        let (next, edits) = rewrite(&current, merge_pair);
        current = next;
        total += edits;
        if edits == 0 {
            tracing::trace!(round, "concat fixpoint");
            break;
        }
    }
    let (joined, edits) = rewrite(&current, fold_table_concat);
    (joined, total + edits)
}

fn merge_pair<'src>(tokens: &[Token<'src>], i: usize) -> Option<(usize, Vec<Token<'src>>)> {
    let left = &tokens[i];
    if !left.is_quoted_string() {
        return None;
    }
    let quote = Quote::of(&left.text)?;
    if follows_operand(tokens, i) || binds_left(tokens, i) {
        return None;
    }
    let op = expect_symbol(tokens, i, "..")?;
    let right = next_code(tokens, op + 1).filter(|&r| tokens[r].is_quoted_string())?;
    if binds_right(tokens, right) {
        return None;
    }
    let mut bytes = decode(&left.text)?;
    bytes.extend(decode(&tokens[right].text)?);
    let merged = render(&bytes, quote);
    tracing::trace!(line = left.line, "literals merged");
    Some((right + 1, vec![left.replaced(TokenKind::String, merged)]))
}

/// An operator before the left literal that binds tighter than `..`.
fn binds_left(tokens: &[Token<'_>], i: usize) -> bool {
    prev_code(tokens, i).is_some_and(|p| tighter_than_concat(&tokens[p]))
}

/// An operator or postfix after the right literal that claims it first.
fn binds_right(tokens: &[Token<'_>], i: usize) -> bool {
    has_postfix(tokens, i) || next_code(tokens, i + 1).is_some_and(|n| tighter_than_concat(&tokens[n]))
}

fn tighter_than_concat(token: &Token<'_>) -> bool {
    match token.kind {
        TokenKind::Operator => matches!(
            token.text.as_ref(),
            "+" | "-" | "*" | "/" | "//" | "%" | "^" | "#"
        ),
        TokenKind::Keyword => token.text == "not",
        _ => false,
    }
}

/// `table.concat({"a", "b"}, ", ")` with only string or integer literal
/// items and separator.
fn fold_table_concat<'src>(tokens: &[Token<'src>], i: usize) -> Option<(usize, Vec<Token<'src>>)> {
    let name = library_call(tokens, i, "table", "concat")?;
    let open = expect_symbol(tokens, name, "(")?;
    let close = matching_close(tokens, open)?;
    let args = split_items(tokens, open, close, &[","], false)?;
    let (table, separator) = match args.as_slice() {
        [table] => (table, None),
        [table, sep] => (table, Some(sep)),
        _ => return None,
    };
    let brace = table.start;
    if !tokens[brace].is_symbol("{") {
        return None;
    }
    let brace_close = matching_close(tokens, brace)?;
    if brace_close + 1 != table.end {
        return None;
    }
    let items = split_items(tokens, brace, brace_close, &[",", ";"], true)?;
    let sep = match separator {
        Some(range) => element_value(&tokens[single(tokens, range)?])?,
        None => Vec::new(),
    };
    let mut joined = Vec::new();
    for (n, item) in items.iter().enumerate() {
        if n > 0 {
            joined.extend_from_slice(&sep);
        }
        joined.extend(element_value(&tokens[single(tokens, item)?])?);
    }
    let literal = render(&joined, Quote::Double);
    tracing::trace!(line = tokens[i].line, items = items.len(), "table.concat folded");
    Some((close + 1, vec![tokens[i].replaced(TokenKind::String, literal)]))
}

/// What `table.concat` appends for an element: a string's value, or the
/// decimal spelling of an integer literal.
fn element_value(token: &Token<'_>) -> Option<Vec<u8>> {
    match token.kind {
        TokenKind::String => decode(&token.text),
        TokenKind::Number if token.text.bytes().all(|b| b.is_ascii_digit()) => {
            Some(token.text.parse::<i64>().ok()?.to_string().into_bytes())
        }
        _ => None,
    }
}
