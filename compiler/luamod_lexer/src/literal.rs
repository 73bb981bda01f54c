//! String literal values.
//!
//! [`decode`] turns the source text of a string token into the bytes Lua
//! would produce at runtime; [`render`] goes the other way for short
//! literals. Lua strings are byte strings, so both sides work on `[u8]`.

use crate::scanner::long_bracket_level;

/// Delimiter of a short string literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
}

impl Quote {
    /// Quote style of a literal's source text, `None` for long and
    /// backtick strings.
    pub fn of(text: &str) -> Option<Quote> {
        match text.as_bytes().first() {
            Some(b'"') => Some(Quote::Double),
            Some(b'\'') => Some(Quote::Single),
            _ => None,
        }
    }

    #[inline]
    pub fn byte(self) -> u8 {
        match self {
            Quote::Double => b'"',
            Quote::Single => b'\'',
        }
    }
}

/// Runtime value of a string literal.
///
/// Returns `None` for backtick strings (interpolation is evaluated at
/// runtime), unterminated literals, raw newlines inside short strings and
/// malformed escapes.
pub fn decode(text: &str) -> Option<Vec<u8>> {
    match text.as_bytes().first()? {
        b'"' | b'\'' => decode_short(text.as_bytes()),
        b'[' => long_body(text).map(|body| body.as_bytes().to_vec()),
        _ => None,
    }
}

/// Body of a closed long string, without the newline that directly
/// follows the opener.
pub fn long_body(text: &str) -> Option<&str> {
    let level = long_bracket_level(text.as_bytes(), 0)?;
    let delim = level + 2;
    if text.len() < delim * 2 {
        return None;
    }
    let close = &text.as_bytes()[text.len() - delim..];
    let closed = close[0] == b']'
        && close[delim - 1] == b']'
        && close[1..delim - 1].iter().all(|&b| b == b'=');
    if !closed {
        return None;
    }
    let body = &text[delim..text.len() - delim];
    let body = ["\r\n", "\n\r", "\n", "\r"]
        .iter()
        .find_map(|nl| body.strip_prefix(nl))
        .unwrap_or(body);
    Some(body)
}

fn decode_short(bytes: &[u8]) -> Option<Vec<u8>> {
    let quote = bytes[0];
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 1;
    while i < bytes.len() {
        let b = bytes[i];
        if b == quote {
            return (i == bytes.len() - 1).then_some(out);
        }
        match b {
            b'\n' => return None,
            b'\\' => i = decode_escape(bytes, i + 1, &mut out)?,
            _ => {
                out.push(b);
                i += 1;
            }
        }
    }
    None
}

/// Decode the escape whose first byte after `\` is at `i`; returns the
/// index just past it.
fn decode_escape(bytes: &[u8], i: usize, out: &mut Vec<u8>) -> Option<usize> {
    let e = *bytes.get(i)?;
    let simple = match e {
        b'a' => Some(0x07),
        b'b' => Some(0x08),
        b'f' => Some(0x0C),
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        b'v' => Some(0x0B),
        b'\\' | b'"' | b'\'' => Some(e),
        _ => None,
    };
    if let Some(value) = simple {
        out.push(value);
        return Some(i + 1);
    }
    match e {
        b'\n' | b'\r' => {
            out.push(b'\n');
            let pair = if e == b'\n' { b'\r' } else { b'\n' };
            Some(if bytes.get(i + 1) == Some(&pair) { i + 2 } else { i + 1 })
        }
        b'x' => {
            let hex = bytes.get(i + 1..i + 3)?;
            let value = parse_radix(hex, 16)?;
            out.push(u8::try_from(value).ok()?);
            Some(i + 3)
        }
        b'z' => {
            let skipped = bytes[i + 1..]
                .iter()
                .take_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0B | 0x0C))
                .count();
            Some(i + 1 + skipped)
        }
        b'0'..=b'9' => {
            let len = bytes[i..].iter().take(3).take_while(|b| b.is_ascii_digit()).count();
            let value = parse_radix(&bytes[i..i + len], 10)?;
            out.push(u8::try_from(value).ok()?);
            Some(i + len)
        }
        b'u' => {
            if bytes.get(i + 1) != Some(&b'{') {
                return None;
            }
            let digits = bytes[i + 2..].iter().take_while(|b| b.is_ascii_hexdigit()).count();
            if digits == 0 || bytes.get(i + 2 + digits) != Some(&b'}') {
                return None;
            }
            let value = parse_radix(&bytes[i + 2..i + 2 + digits], 16)?;
            let ch = char::from_u32(value)?;
            let mut buf = [0u8; 4];
            out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            Some(i + 3 + digits)
        }
        _ => None,
    }
}

fn parse_radix(digits: &[u8], radix: u32) -> Option<u32> {
    let text = std::str::from_utf8(digits).ok()?;
    u32::from_str_radix(text, radix).ok()
}

/// Render `bytes` as a short literal delimited by `quote`.
///
/// Printable characters, including non-ASCII UTF-8, are written raw. The
/// delimiter, `\`, newline, carriage return and tab use their named escape;
/// other control bytes and invalid UTF-8 use a three-digit `\ddd` escape so
/// that a following digit cannot extend it.
pub fn render(bytes: &[u8], quote: Quote) -> String {
    let q = char::from(quote.byte());
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push(q);
    for chunk in bytes.utf8_chunks() {
        for ch in chunk.valid().chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c == q => {
                    out.push('\\');
                    out.push(c);
                }
                c if c.is_ascii_control() => push_decimal_escape(&mut out, c as u8),
                c => out.push(c),
            }
        }
        for &b in chunk.invalid() {
            push_decimal_escape(&mut out, b);
        }
    }
    out.push(q);
    out
}

fn push_decimal_escape(out: &mut String, b: u8) {
    use std::fmt::Write;
    let _ = write!(out, "\\{b:03}");
}

/// Re-delimit a short literal with `target` without adding any escape.
///
/// Escaped occurrences of the old delimiter are unescaped. Returns `None`
/// when the literal is not a short string or its body contains a raw
/// `target` delimiter.
pub fn requote(text: &str, target: Quote) -> Option<String> {
    let from = Quote::of(text)?;
    if from == target {
        return Some(text.to_owned());
    }
    let body = text.strip_prefix(char::from(from.byte()))?;
    let body = body.strip_suffix(char::from(from.byte()))?;
    let (old, new) = (char::from(from.byte()), char::from(target.byte()));
    let mut out = String::with_capacity(text.len());
    out.push(new);
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars.next()?;
                if escaped != old {
                    out.push('\\');
                }
                out.push(escaped);
            }
            c if c == new => return None,
            c => out.push(c),
        }
    }
    out.push(new);
    Some(out)
}
