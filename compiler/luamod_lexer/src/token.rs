//! Token types.
//!
//! A [`Token`] carries its exact source text, so whitespace and newline
//! tokens are as much part of the stream as keywords. Passes that rewrite
//! the stream replace `text` with an owned value and keep the position of
//! the token they replaced.

use std::borrow::Cow;
use std::fmt;

/// Lexical category of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Reserved word (`local`, `function`, `continue`, ...).
    Keyword,
    /// Name that is not a keyword.
    Identifier,
    /// Arithmetic, comparison, concatenation and assignment symbols.
    Operator,
    /// `( ) { } [ ] ; : , .` and `::`.
    Punctuation,
    /// Numeric literal, decimal or hex.
    Number,
    /// Quoted, backtick or long-bracket string literal.
    String,
    /// Line or long-bracket comment.
    Comment,
    /// A single `\n`.
    Newline,
    /// A run of horizontal whitespace (space, tab, `\r`, VT, FF).
    Whitespace,
    /// Any character the scanner has no rule for.
    Unknown,
}

impl TokenKind {
    /// Keywords, identifiers and numbers: tokens that fuse when adjacent.
    #[inline]
    pub fn is_word(self) -> bool {
        matches!(self, Self::Keyword | Self::Identifier | Self::Number)
    }

    /// Whitespace, newlines and comments.
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Newline | Self::Comment)
    }

    /// Lowercase name used in diagnostics and debug dumps.
    pub fn name(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Identifier => "identifier",
            Self::Operator => "operator",
            Self::Punctuation => "punctuation",
            Self::Number => "number",
            Self::String => "string",
            Self::Comment => "comment",
            Self::Newline => "newline",
            Self::Whitespace => "whitespace",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One lexeme with its source position.
///
/// `line` and `column` are 1-based; `column` counts bytes from the start of
/// the line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: Cow<'src, str>,
    pub line: u32,
    pub column: u32,
}

impl<'src> Token<'src> {
    /// Create a token borrowing its text from the source.
    pub fn new(kind: TokenKind, text: &'src str, line: u32, column: u32) -> Self {
        Self {
            kind,
            text: Cow::Borrowed(text),
            line,
            column,
        }
    }

    /// Create a token that replaces `self`, keeping its position.
    pub fn replaced(&self, kind: TokenKind, text: impl Into<Cow<'src, str>>) -> Self {
        Self {
            kind,
            text: text.into(),
            line: self.line,
            column: self.column,
        }
    }

    /// Create a token with no source position (`0:0`).
    pub fn synthetic(kind: TokenKind, text: impl Into<Cow<'src, str>>) -> Self {
        Self {
            kind,
            text: text.into(),
            line: 0,
            column: 0,
        }
    }

    /// Detach the token from the source lifetime.
    pub fn into_owned(self) -> Token<'static> {
        Token {
            kind: self.kind,
            text: Cow::Owned(self.text.into_owned()),
            line: self.line,
            column: self.column,
        }
    }

    #[inline]
    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    /// `true` for the keyword `kw`.
    #[inline]
    pub fn is_keyword(&self, kw: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == kw
    }

    /// `true` for the operator or punctuation symbol `sym`.
    #[inline]
    pub fn is_symbol(&self, sym: &str) -> bool {
        matches!(self.kind, TokenKind::Operator | TokenKind::Punctuation) && self.text == sym
    }

    /// `true` for the identifier `name`.
    #[inline]
    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == name
    }

    /// `true` for a long-bracket string (`[[...]]`, `[==[...]==]`).
    pub fn is_long_string(&self) -> bool {
        self.kind == TokenKind::String && self.text.starts_with('[')
    }

    /// `true` for a `"` or `'` delimited string.
    pub fn is_quoted_string(&self) -> bool {
        self.kind == TokenKind::String && (self.text.starts_with('"') || self.text.starts_with('\''))
    }

    /// `true` for a Luau backtick string, which may embed `{...}` code.
    pub fn is_interpolated(&self) -> bool {
        self.kind == TokenKind::String && self.text.starts_with('`')
    }

    /// `true` for a string or long comment that reached end of input
    /// without its closing delimiter.
    pub fn is_unterminated(&self) -> bool {
        match self.kind {
            TokenKind::String => {
                if self.is_long_string() {
                    !long_bracket_closed(&self.text)
                } else {
                    !quoted_closed(&self.text)
                }
            }
            TokenKind::Comment => {
                let body = &self.text[2..];
                crate::scanner::long_bracket_level(body.as_bytes(), 0)
                    .is_some_and(|_| !long_bracket_closed(body))
            }
            _ => false,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}) at {}:{}", self.kind, self.text, self.line, self.column)
    }
}

/// `text` starts with a long-bracket opener; is the matching closer present?
fn long_bracket_closed(text: &str) -> bool {
    let bytes = text.as_bytes();
    let Some(level) = crate::scanner::long_bracket_level(bytes, 0) else {
        return false;
    };
    let open_len = level + 2;
    if bytes.len() < open_len * 2 {
        return false;
    }
    let close = &bytes[bytes.len() - open_len..];
    close[0] == b']' && close[open_len - 1] == b']' && close[1..open_len - 1].iter().all(|&b| b == b'=')
}

/// Quoted string: does the last byte close the opening quote?
fn quoted_closed(text: &str) -> bool {
    let bytes = text.as_bytes();
    let Some(&quote) = bytes.first() else {
        return false;
    };
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i == bytes.len() - 1,
            _ => i += 1,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unterminated_quoted() {
        let t = Token::new(TokenKind::String, "\"abc", 1, 1);
        assert!(t.is_unterminated());
        let t = Token::new(TokenKind::String, "\"ab\\\"", 1, 1);
        assert!(t.is_unterminated());
        let t = Token::new(TokenKind::String, "\"ab\\\\\"", 1, 1);
        assert!(!t.is_unterminated());
    }

    #[test]
    fn unterminated_long_string() {
        assert!(Token::new(TokenKind::String, "[==[hello]=]", 1, 1).is_unterminated());
        assert!(!Token::new(TokenKind::String, "[==[hello]==]", 1, 1).is_unterminated());
        assert!(!Token::new(TokenKind::String, "[[]]", 1, 1).is_unterminated());
        assert!(Token::new(TokenKind::String, "[[", 1, 1).is_unterminated());
    }

    #[test]
    fn unterminated_comment() {
        assert!(Token::new(TokenKind::Comment, "--[[ open", 1, 1).is_unterminated());
        assert!(!Token::new(TokenKind::Comment, "--[[ closed ]]", 1, 1).is_unterminated());
        assert!(!Token::new(TokenKind::Comment, "-- line", 1, 1).is_unterminated());
    }

    #[test]
    fn replaced_keeps_position() {
        let t = Token::new(TokenKind::Identifier, "x", 3, 7);
        let r = t.replaced(TokenKind::Number, "5".to_string());
        assert_eq!((r.line, r.column), (3, 7));
        assert_eq!(r.text, "5");
    }
}
