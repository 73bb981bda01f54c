//! Canonical literal spellings for aggressive minification.

use luamod_lexer::literal::{requote, Quote};

/// Shortest equivalent spelling of a numeric literal.
///
/// `_` separators are dropped everywhere. Decimal literals without an
/// exponent also lose trailing fractional zeros, a trailing bare `.` and
/// the `0` before a leading `.`. Hex literals are otherwise untouched.
pub fn number(text: &str) -> String {
    let mut out: String = text.chars().filter(|&c| c != '_').collect();
    let is_hex = out.starts_with("0x") || out.starts_with("0X");
    let has_exponent = out.contains(['e', 'E']);
    if is_hex || has_exponent || !out.contains('.') {
        return out;
    }
    let trimmed = out.trim_end_matches('0').trim_end_matches('.').len();
    out.truncate(trimmed);
    if out.starts_with("0.") {
        out.remove(0);
    }
    if out.is_empty() || out == "." {
        out = "0".to_owned();
    }
    out
}

/// Shortest short-string spelling reachable by swapping delimiters,
/// preferring `"` when both are equally long. Long and backtick strings
/// are returned unchanged.
pub fn string(text: &str) -> String {
    if Quote::of(text).is_none() {
        return text.to_owned();
    }
    let double = requote(text, Quote::Double);
    let single = requote(text, Quote::Single);
    match (double, single) {
        (Some(d), Some(s)) if s.len() < d.len() => s,
        (Some(d), _) => d,
        (None, Some(s)) => s,
        (None, None) => text.to_owned(),
    }
}

#[cfg(test)]
mod tests;
