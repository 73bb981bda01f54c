//! Numeric escape normalization inside short string literals.
//!
//! `\xHH`, `\DDD` and `\u{...}` escapes are decoded and re-rendered: bytes
//! that form printable text come out raw, everything else as a three-digit
//! `\DDD`. Named escapes (`\n`, `\\`, `\"`, `\z`, ...) and raw text are kept
//! as written. A literal that does not decode cleanly is left unmodified.

use std::sync::OnceLock;

use luamod_lexer::literal::{decode, render, Quote};
use luamod_lexer::{Token, TokenKind};
use regex::{Captures, Regex};

/// One escape sequence. The final alternative swallows any other escaped
/// character so that `\\x41` is read as `\\` followed by raw `x41`.
fn escape_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::expect_used, reason = "the pattern is a compile-time constant")]
        Regex::new(r"\\(?:x([0-9A-Fa-f]{2})|([0-9]{1,3})|u\{([0-9A-Fa-f]+)\}|(?s:.))")
            .expect("escape pattern is valid")
    })
}

pub fn apply<'src>(tokens: &[Token<'src>]) -> (Vec<Token<'src>>, usize) {
    let mut edits = 0;
    let out = tokens
        .iter()
        .map(|token| match normalize(token) {
            Some(text) => {
                edits += 1;
                tracing::trace!(line = token.line, "escapes normalized");
                token.replaced(TokenKind::String, text)
            }
            None => token.clone(),
        })
        .collect();
    (out, edits)
}

/// New text for `token` when it is a short literal whose numeric escapes
/// change on normalization.
fn normalize(token: &Token<'_>) -> Option<String> {
    if token.kind != TokenKind::String || !token.text.contains('\\') {
        return None;
    }
    let quote = Quote::of(&token.text)?;
    decode(&token.text)?;
    let text = token.text.as_ref();
    let body = &text[1..text.len() - 1];
    let rewritten = normalize_body(body, quote)?;
    (rewritten != body).then(|| format!("{q}{rewritten}{q}", q = char::from(quote.byte())))
}

fn normalize_body(body: &str, quote: Quote) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut pending: Vec<u8> = Vec::new();
    let mut last = 0;
    for caps in escape_pattern().captures_iter(body) {
        let whole = caps.get(0)?;
        let raw = &body[last..whole.start()];
        if !raw.is_empty() {
            flush(&mut out, &mut pending, quote);
            out.push_str(raw);
        }
        last = whole.end();
        match numeric_value(&caps)? {
            Some(bytes) => pending.extend_from_slice(&bytes),
            None => {
                flush(&mut out, &mut pending, quote);
                out.push_str(whole.as_str());
            }
        }
    }
    flush(&mut out, &mut pending, quote);
    out.push_str(&body[last..]);
    Some(out)
}

/// Bytes denoted by a numeric escape; `Some(None)` for any other escape,
/// `None` for a numeric escape out of range.
fn numeric_value(caps: &Captures<'_>) -> Option<Option<Vec<u8>>> {
    if let Some(hex) = caps.get(1) {
        let value = u8::from_str_radix(hex.as_str(), 16).ok()?;
        return Some(Some(vec![value]));
    }
    if let Some(dec) = caps.get(2) {
        let value = dec.as_str().parse::<u8>().ok()?;
        return Some(Some(vec![value]));
    }
    if let Some(code) = caps.get(3) {
        let value = u32::from_str_radix(code.as_str(), 16).ok()?;
        let ch = char::from_u32(value)?;
        return Some(Some(ch.to_string().into_bytes()));
    }
    Some(None)
}

/// Render the decoded bytes in `pending`, without delimiters.
fn flush(out: &mut String, pending: &mut Vec<u8>, quote: Quote) {
    if pending.is_empty() {
        return;
    }
    let rendered = render(pending, quote);
    out.push_str(&rendered[1..rendered.len() - 1]);
    pending.clear();
}
