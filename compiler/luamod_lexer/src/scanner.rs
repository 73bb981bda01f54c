//! Single-pass scanner producing [`Token`]s.
//!
//! The scanner is total. Malformed input never stops it: an unterminated
//! string, long string or long comment runs to end of input, and a byte
//! with no rule becomes one [`TokenKind::Unknown`] token covering a whole
//! UTF-8 scalar. Every byte of the source lands in exactly one token.
//!
//! # Design
//!
//! Main dispatch matches on the current byte. Each arm calls a focused
//! method that advances the cursor and returns the token kind; the text is
//! the slice between the start position and the cursor.

use crate::cursor::Cursor;
use crate::names::NameTables;
use crate::token::{Token, TokenKind};

/// Three-byte operators, tried before the two-byte table.
const OPS3: &[&str] = &["...", "..=", "//="];

/// Two-byte operators and `::`.
const OPS2: &[&str] = &[
    "==", "~=", "<=", ">=", "..", "//", "+=", "-=", "*=", "/=", "%=", "^=", "::", "->", "<<",
    ">>",
];

/// Single-byte operators.
const OPS1: &[u8] = b"+-*/%^#&~|<>=";

/// Single-byte punctuation.
const PUNCT1: &[u8] = b"(){}[];:,.";

/// Level of a long-bracket opener (`[`, `=`×n, `[`) at `bytes[at..]`.
pub(crate) fn long_bracket_level(bytes: &[u8], at: usize) -> Option<usize> {
    if bytes.get(at) != Some(&b'[') {
        return None;
    }
    let level = bytes[at + 1..].iter().take_while(|&&b| b == b'=').count();
    (bytes.get(at + 1 + level) == Some(&b'[')).then_some(level)
}

#[inline]
fn is_horizontal_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | 0x0B | 0x0C)
}

#[inline]
fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Token iterator over a source string.
pub struct Scanner<'src, 't> {
    cursor: Cursor<'src>,
    tables: &'t NameTables,
    line: u32,
    column: u32,
}

impl<'src, 't> Scanner<'src, 't> {
    pub fn new(source: &'src str, tables: &'t NameTables) -> Self {
        Self {
            cursor: Cursor::new(source),
            tables,
            line: 1,
            column: 1,
        }
    }

    fn scan(&mut self) -> TokenKind {
        match self.cursor.current() {
            b'\n' => {
                self.cursor.advance();
                TokenKind::Newline
            }
            b if is_horizontal_space(b) => {
                self.cursor.eat_while(is_horizontal_space);
                TokenKind::Whitespace
            }
            b'-' if self.cursor.peek() == b'-' => self.comment(),
            b'"' | b'\'' | b'`' => self.quoted_string(),
            b'[' => self.bracket(),
            b'0'..=b'9' => self.number(),
            b'.' if self.cursor.peek().is_ascii_digit() => self.number(),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(),
            _ => self.symbol(),
        }
    }

    // ─── Comments ───────────────────────────────────────────────────────

    fn comment(&mut self) -> TokenKind {
        self.cursor.advance_n(2);
        match long_bracket_level(self.cursor.rest(), 0) {
            Some(level) => self.long_bracket_body(level),
            None => self.cursor.eat_until_newline_or_eof(),
        }
        TokenKind::Comment
    }

    // ─── Strings ────────────────────────────────────────────────────────

    /// `"..."`, `'...'` or `` `...` ``. A backslash escapes the next
    /// scalar; a raw newline does not end the string.
    fn quoted_string(&mut self) -> TokenKind {
        let quote = self.cursor.current();
        self.cursor.advance();
        loop {
            match self.cursor.skip_to_string_delim(quote) {
                b'\\' => {
                    self.cursor.advance();
                    if !self.cursor.is_eof() {
                        self.cursor.advance_char();
                    }
                }
                0 => break,
                _ => {
                    self.cursor.advance();
                    break;
                }
            }
        }
        TokenKind::String
    }

    fn bracket(&mut self) -> TokenKind {
        match long_bracket_level(self.cursor.rest(), 0) {
            Some(level) => {
                self.long_bracket_body(level);
                TokenKind::String
            }
            None => {
                self.cursor.advance();
                TokenKind::Punctuation
            }
        }
    }

    /// Consume a long-bracket opener of `level` and its body up to and
    /// including `]` `=`×level `]`, or to end of input.
    fn long_bracket_body(&mut self, level: usize) {
        self.cursor.advance_n(level + 2);
        while self.cursor.skip_to_close_bracket() {
            let closes = (1..=level).all(|i| self.cursor.peek_at(i) == b'=')
                && self.cursor.peek_at(level + 1) == b']';
            if closes {
                self.cursor.advance_n(level + 2);
                return;
            }
            self.cursor.advance();
        }
    }

    // ─── Numbers ────────────────────────────────────────────────────────

    fn number(&mut self) -> TokenKind {
        let c = &mut self.cursor;
        if c.current() == b'0' && matches!(c.peek(), b'x' | b'X') {
            c.advance_n(2);
            c.eat_while(|b| b.is_ascii_hexdigit() || b == b'.' || b == b'_');
            self.exponent(b'p');
        } else if c.current() == b'0' && matches!(c.peek(), b'b' | b'B') {
            c.advance_n(2);
            c.eat_while(|b| matches!(b, b'0' | b'1' | b'_'));
        } else {
            c.eat_while(|b| b.is_ascii_digit() || b == b'.' || b == b'_');
            self.exponent(b'e');
        }
        TokenKind::Number
    }

    /// Optional exponent: `marker` (either case), optional sign, digits.
    fn exponent(&mut self, marker: u8) {
        let c = &mut self.cursor;
        if c.current().to_ascii_lowercase() != marker {
            return;
        }
        let digits_at = if matches!(c.peek(), b'+' | b'-') { 2 } else { 1 };
        if c.peek_at(digits_at).is_ascii_digit() {
            c.advance_n(digits_at);
            c.eat_while(|b| b.is_ascii_digit());
        }
    }

    // ─── Identifiers ────────────────────────────────────────────────────

    fn identifier(&mut self) -> TokenKind {
        let start = self.cursor.pos();
        self.cursor.eat_while(is_ident_continue);
        if self.tables.is_keyword(self.cursor.slice_from(start)) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        }
    }

    // ─── Operators & Punctuation ────────────────────────────────────────

    /// Maximal munch over the operator tables.
    fn symbol(&mut self) -> TokenKind {
        let rest = self.cursor.rest();
        for table in [OPS3, OPS2] {
            if let Some(op) = table.iter().find(|op| rest.starts_with(op.as_bytes())) {
                self.cursor.advance_n(op.len());
                return if *op == "::" {
                    TokenKind::Punctuation
                } else {
                    TokenKind::Operator
                };
            }
        }
        let b = self.cursor.current();
        if OPS1.contains(&b) {
            self.cursor.advance();
            TokenKind::Operator
        } else if PUNCT1.contains(&b) {
            self.cursor.advance();
            TokenKind::Punctuation
        } else {
            self.cursor.advance_char();
            TokenKind::Unknown
        }
    }

    /// Move the line/column counters past `text`.
    fn track_position(&mut self, text: &str) {
        let bytes = text.as_bytes();
        match memchr::memrchr(b'\n', bytes) {
            Some(last) => {
                let newlines = memchr::memchr_iter(b'\n', bytes).count();
                self.line = self.line.saturating_add(u32::try_from(newlines).unwrap_or(u32::MAX));
                self.column = u32::try_from(bytes.len() - last).unwrap_or(u32::MAX);
            }
            None => {
                let width = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
                self.column = self.column.saturating_add(width);
            }
        }
    }
}

impl<'src> Iterator for Scanner<'src, '_> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Token<'src>> {
        if self.cursor.is_eof() {
            return None;
        }
        let start = self.cursor.pos();
        let (line, column) = (self.line, self.column);
        let kind = self.scan();
        let text = self.cursor.slice_from(start);
        self.track_position(text);
        Some(Token::new(kind, text, line, column))
    }
}
