//! Single-character byte queries to integer literals.
//!
//! ```text
//! string.byte("A")   ->  65
//! ("A"):byte()       ->  65
//! "A":byte()         ->  65
//! ```

use luamod_lexer::literal::decode;
use luamod_lexer::{Token, TokenKind};

use crate::edit::{
    expect_ident, expect_symbol, follows_operand, has_postfix, library_call, matching_close,
    next_code, rewrite, single, split_items,
};

pub fn apply<'src>(tokens: &[Token<'src>]) -> (Vec<Token<'src>>, usize) {
    rewrite(tokens, |tokens, i| {
        let (end, byte) = library_form(tokens, i).or_else(|| method_form(tokens, i))?;
        tracing::trace!(line = tokens[i].line, byte, "byte query decoded");
        Some((end + 1, vec![tokens[i].replaced(TokenKind::Number, byte.to_string())]))
    })
}

/// `string.byte(<lit>)`; returns the index of the closing paren.
fn library_form(tokens: &[Token<'_>], i: usize) -> Option<(usize, u8)> {
    let name = library_call(tokens, i, "string", "byte")?;
    let open = expect_symbol(tokens, name, "(")?;
    let close = matching_close(tokens, open)?;
    let args = split_items(tokens, open, close, &[","], false)?;
    let [arg] = args.as_slice() else {
        return None;
    };
    let byte = single_byte(&tokens[single(tokens, arg)?])?;
    Some((close, byte))
}

/// `("c"):byte()` or `"c":byte()`, not continuing a previous operand.
fn method_form(tokens: &[Token<'_>], i: usize) -> Option<(usize, u8)> {
    if follows_operand(tokens, i) {
        return None;
    }
    let (literal, after) = if tokens[i].is_symbol("(") {
        let lit = next_code(tokens, i + 1)?;
        (lit, expect_symbol(tokens, lit, ")")?)
    } else {
        (i, i)
    };
    let byte = single_byte(&tokens[literal])?;
    let colon = expect_symbol(tokens, after, ":")?;
    let method = expect_ident(tokens, colon, "byte")?;
    let open = expect_symbol(tokens, method, "(")?;
    let close = expect_symbol(tokens, open, ")")?;
    if has_postfix(tokens, close) {
        return None;
    }
    Some((close, byte))
}

/// The value of a string literal holding exactly one byte.
fn single_byte(token: &Token<'_>) -> Option<u8> {
    if token.kind != TokenKind::String {
        return None;
    }
    match decode(&token.text)?.as_slice() {
        [b] => Some(*b),
        _ => None,
    }
}
