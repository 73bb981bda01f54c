//! Compact token serialization.

use luamod_lexer::{needs_separator, tokenize, Token};

/// Emit every significant token with a single space only where two
/// neighbours would otherwise lex differently. Whitespace, newlines and
/// comments are dropped.
pub fn serialize(tokens: &[Token<'_>]) -> String {
    let mut out = String::with_capacity(tokens.iter().map(|t| t.text.len()).sum());
    let mut prev: Option<&Token<'_>> = None;
    for token in tokens.iter().filter(|t| !t.is_trivia()) {
        if prev.is_some_and(|p| needs_separator(p, token)) {
            out.push(' ');
        }
        out.push_str(&token.text);
        prev = Some(token);
    }
    out
}

/// Re-lex `text` and serialize it compactly.
pub fn normalize(text: &str) -> String {
    serialize(&tokenize(text))
}
