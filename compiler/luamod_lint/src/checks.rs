//! The three validation checks, each over one token stream.

use std::sync::OnceLock;

use luamod_fmt::DepthAnnotated;
use luamod_lexer::literal::decode;
use luamod_lexer::{NameTables, Token, TokenKind};
use regex::Regex;

use crate::issue::{Api, SyntaxError, Warning};

// ─── Block structure ────────────────────────────────────────────────────

/// The earliest structural failure, if any.
pub(crate) fn syntax(tokens: &[Token<'_>], annotated: &DepthAnnotated) -> Option<SyntaxError> {
    let unterminated = tokens.iter().position(Token::is_unterminated);
    let unmatched = annotated.unmatched.first().copied();
    let first = match (unterminated, unmatched) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    if let Some(i) = first {
        let token = &tokens[i];
        return Some(if Some(i) == unterminated {
            SyntaxError::Unterminated {
                what: if token.kind == TokenKind::Comment { "long comment" } else { "string" },
                line: token.line,
            }
        } else {
            SyntaxError::UnmatchedCloser {
                keyword: token.text.to_string(),
                line: token.line,
            }
        });
    }
    (annotated.open_depth > 0).then_some(SyntaxError::Unclosed {
        depth: annotated.open_depth,
    })
}

// ─── Rename risks ───────────────────────────────────────────────────────

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::expect_used, reason = "the pattern is a compile-time constant")]
        Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("word pattern is valid")
    })
}

/// One warning per non-keyword word in each quoted string's value.
pub(crate) fn rename_risks(tokens: &[Token<'_>], tables: &NameTables) -> Vec<Warning> {
    let mut warnings = Vec::new();
    for token in tokens.iter().filter(|t| t.is_quoted_string()) {
        let Some(bytes) = decode(&token.text) else {
            continue;
        };
        let value = String::from_utf8_lossy(&bytes);
        for word in word_pattern().find_iter(&value) {
            if !tables.is_keyword(word.as_str()) {
                warnings.push(Warning::RenameRisk {
                    word: word.as_str().to_owned(),
                    line: token.line,
                });
            }
        }
    }
    warnings
}

// ─── API arguments ──────────────────────────────────────────────────────

/// One warning per call whose argument list does not open with a string
/// literal, in source order.
pub(crate) fn api_calls(tokens: &[Token<'_>]) -> Vec<Warning> {
    let code: Vec<&Token<'_>> = tokens
        .iter()
        .filter(|t| !matches!(t.kind, TokenKind::Whitespace | TokenKind::Newline | TokenKind::Comment))
        .collect();
    let mut warnings = Vec::new();
    for i in 0..code.len() {
        for api in Api::ALL {
            if let Some(line) = non_literal_call(&code, i, api) {
                warnings.push(Warning::NonLiteralArgument { api, line });
            }
        }
    }
    warnings
}

fn non_literal_call(code: &[&Token<'_>], i: usize, api: Api) -> Option<u32> {
    let (named, open) = match api {
        Api::GetService | Api::WaitForChild => (code[i].is_ident(api.name()), i + 1),
        Api::InstanceNew => (
            code[i].is_ident("Instance")
                && code.get(i + 1).is_some_and(|t| t.is_symbol("."))
                && code.get(i + 2).is_some_and(|t| t.is_ident("new")),
            i + 3,
        ),
    };
    if !named {
        return None;
    }
    if !code.get(open)?.is_symbol("(") {
        return None;
    }
    let literal = code.get(open + 1).is_some_and(|t| t.kind == TokenKind::String);
    (!literal).then_some(code[i].line)
}

#[cfg(test)]
mod tests;
