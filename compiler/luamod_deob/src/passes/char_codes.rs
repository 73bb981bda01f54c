//! `string.char(104, 105)` to `"hi"`.

use luamod_lexer::literal::{render, Quote};
use luamod_lexer::{Token, TokenKind};

use crate::edit::{expect_symbol, library_call, matching_close, rewrite, single, split_items};

pub fn apply<'src>(tokens: &[Token<'src>]) -> (Vec<Token<'src>>, usize) {
    rewrite(tokens, |tokens, i| {
        let name = library_call(tokens, i, "string", "char")?;
        let open = expect_symbol(tokens, name, "(")?;
        let close = matching_close(tokens, open)?;
        let args = split_items(tokens, open, close, &[","], false)?;
        if args.is_empty() {
            return None;
        }
        let bytes = args
            .iter()
            .map(|arg| single(tokens, arg).and_then(|a| char_code(&tokens[a])))
            .collect::<Option<Vec<u8>>>()?;
        let literal = render(&bytes, Quote::Double);
        tracing::trace!(line = tokens[i].line, %literal, "string.char decoded");
        Some((close + 1, vec![tokens[i].replaced(TokenKind::String, literal)]))
    })
}

/// A decimal or hex integer literal in `0..=255`.
pub(crate) fn char_code(token: &Token<'_>) -> Option<u8> {
    if token.kind != TokenKind::Number {
        return None;
    }
    let text = token.text.as_ref();
    let value = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None if text.bytes().all(|b| b.is_ascii_digit()) => text.parse::<u32>().ok()?,
        None => return None,
    };
    u8::try_from(value).ok()
}
