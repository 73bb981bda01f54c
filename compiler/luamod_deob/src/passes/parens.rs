//! `("text")` to `"text"` where the parens only group.

use luamod_lexer::{Token, TokenKind};

use crate::edit::{expect_symbol, follows_operand, has_postfix, next_code, rewrite};

pub fn apply<'src>(tokens: &[Token<'src>]) -> (Vec<Token<'src>>, usize) {
    rewrite(tokens, |tokens, i| {
        if !tokens[i].is_symbol("(") || follows_operand(tokens, i) {
            return None;
        }
        let literal = next_code(tokens, i + 1).filter(|&s| tokens[s].kind == TokenKind::String)?;
        let close = expect_symbol(tokens, literal, ")")?;
        // `("a"):rep(2)` needs its parens
        if has_postfix(tokens, close) {
            return None;
        }
        tracing::trace!(line = tokens[i].line, "string parens dropped");
        Some((close + 1, vec![tokens[literal].clone()]))
    })
}
