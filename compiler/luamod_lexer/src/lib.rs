//! Lossless Lua/Luau tokenizer.
//!
//! Every luamod pass (formatter, minifier, deobfuscator, linter) shares the
//! lexical model defined here. The scanner is total: it never fails, and the
//! token sequence it produces concatenates back into the original input
//! byte-for-byte, whitespace and newlines included.
//!
//! # Pipeline
//!
//! ```text
//! &str ──► Cursor ──► Scanner ──► Vec<Token>
//!                       │
//!                       └─ NameTables (keywords, global allow-list)
//! ```
//!
//! # Modules
//!
//! - [`token`]: `Token` and `TokenKind`
//! - [`cursor`]: byte cursor with bounded lookahead
//! - [`scanner`]: the single-pass dispatch loop
//! - [`names`]: static keyword / global allow-list tables
//! - [`glue`]: rules for when two tokens need a separator
//! - [`interpolation`]: code inside Luau backtick strings
//! - [`literal`]: decoding and rendering of string literals
//!
//! # Example
//!
//! ```
//! use luamod_lexer::{tokenize, TokenKind};
//!
//! let tokens = tokenize("local x = [==[hi]==]");
//! let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(kinds[0], TokenKind::Keyword);
//! assert_eq!(tokens.last().map(|t| t.text.as_ref()), Some("[==[hi]==]"));
//! ```

pub mod cursor;
pub mod glue;
pub mod interpolation;
pub mod literal;
pub mod names;
pub mod scanner;
pub mod token;

pub use cursor::Cursor;
pub use glue::needs_separator;
pub use names::NameTables;
pub use scanner::Scanner;
pub use token::{Token, TokenKind};

/// Tokenize `source` with the default Lua/Luau name tables.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    tokenize_with(source, NameTables::lua())
}

/// Tokenize `source` classifying identifiers against `tables`.
pub fn tokenize_with<'src>(source: &'src str, tables: &NameTables) -> Vec<Token<'src>> {
    Scanner::new(source, tables).collect()
}

/// Concatenate token texts.
///
/// For a fresh token stream this reproduces the scanned source exactly.
pub fn concat(tokens: &[Token<'_>]) -> String {
    let len = tokens.iter().map(|t| t.text.len()).sum();
    let mut out = String::with_capacity(len);
    for token in tokens {
        out.push_str(&token.text);
    }
    out
}

/// Index of the next token at or after `from` that is not whitespace, a
/// newline or a comment.
pub fn next_significant(tokens: &[Token<'_>], from: usize) -> Option<usize> {
    (from..tokens.len()).find(|&i| !tokens[i].is_trivia())
}

/// Index of the closest token before `before` that is not trivia.
pub fn prev_significant(tokens: &[Token<'_>], before: usize) -> Option<usize> {
    (0..before.min(tokens.len()))
        .rev()
        .find(|&i| !tokens[i].is_trivia())
}
