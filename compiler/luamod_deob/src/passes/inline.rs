//! Payload inlining.
//!
//! `load("...")`, `loadstring("...")` and the call-by-string form
//! `loadstring "..."` become `(function()\n<payload>\nend)`, where the
//! payload has been through the pipeline with one less unit of budget. A
//! call met with no budget left is kept as written.

use luamod_lexer::literal::decode;
use luamod_lexer::{Token, TokenKind};

use crate::edit::{
    expect_symbol, is_field, matching_close, next_code, owned_tokens, rewrite, single, split_items,
};
use crate::pipeline;

pub fn apply<'src>(tokens: &[Token<'src>], budget: u32) -> (Vec<Token<'src>>, usize) {
    if budget == 0 {
        return (tokens.to_vec(), 0);
    }
    rewrite(tokens, |tokens, i| {
        let (end, literal) = loader_call(tokens, i)?;
        let bytes = decode(&tokens[literal].text)?;
        let payload = String::from_utf8(bytes).ok()?;
        let inner = pipeline::run(&payload, budget - 1);
        tracing::trace!(line = tokens[i].line, budget, bytes = inner.len(), "payload inlined");
        let wrapped = format!("(function()\n{inner}\nend)");
        Some((end + 1, owned_tokens(&wrapped)))
    })
}

/// A loader call at `i` whose only argument is a string literal. Returns
/// the index of the call's last token and of the literal.
fn loader_call(tokens: &[Token<'_>], i: usize) -> Option<(usize, usize)> {
    let is_loader = tokens[i].is_ident("load") || tokens[i].is_ident("loadstring");
    if !is_loader || is_field(tokens, i) {
        return None;
    }
    let next = next_code(tokens, i + 1)?;
    if tokens[next].kind == TokenKind::String {
        return Some((next, next));
    }
    let open = expect_symbol(tokens, i, "(")?;
    let close = matching_close(tokens, open)?;
    let args = split_items(tokens, open, close, &[","], false)?;
    let [arg] = args.as_slice() else {
        return None;
    };
    let literal = single(tokens, arg).filter(|&a| tokens[a].kind == TokenKind::String)?;
    Some((close, literal))
}
