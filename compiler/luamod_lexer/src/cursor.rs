//! Byte cursor over a source string.
//!
//! Reads past the end of the source return `0x00`, so the scanner's
//! dispatch can treat the zero byte as end of input. Interior NUL bytes
//! also read as `0x00`; [`Cursor::is_eof`] tells the two apart.

/// Byte cursor with bounded lookahead.
///
/// The cursor is [`Copy`], so the scanner can snapshot it before trying a
/// speculative match (long-bracket openers) and restore it on failure.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at position 0.
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Byte at the current position, `0` at end of input.
    #[inline]
    pub fn current(&self) -> u8 {
        self.peek_at(0)
    }

    /// Byte one position ahead of current.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.peek_at(1)
    }

    /// Byte `n` positions ahead of current, `0` past the end.
    #[inline]
    pub fn peek_at(&self, n: usize) -> u8 {
        self.src.as_bytes().get(self.pos + n).copied().unwrap_or(0)
    }

    #[inline]
    pub fn advance(&mut self) {
        self.advance_n(1);
    }

    /// Advance by `n` bytes, stopping at end of input.
    #[inline]
    pub fn advance_n(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.src.len());
    }

    /// Advance past one full UTF-8 scalar.
    pub fn advance_char(&mut self) {
        let width = self.src[self.pos..].chars().next().map_or(1, char::len_utf8);
        self.advance_n(width);
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Current byte offset.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Remaining unread bytes.
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        &self.src.as_bytes()[self.pos..]
    }

    /// Source text from `start` to the current position.
    ///
    /// `start` must be a position previously returned by [`Cursor::pos`].
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.src[start..self.pos]
    }

    /// Advance while `pred` holds for the current byte.
    ///
    /// `pred(0)` must be `false`, otherwise the loop stops only at the end of
    /// the source.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.pos += 1;
        }
    }

    /// Advance to the next `\n` (not consumed) or to end of input.
    pub fn eat_until_newline_or_eof(&mut self) {
        match memchr::memchr(b'\n', self.rest()) {
            Some(offset) => self.pos += offset,
            None => self.pos = self.src.len(),
        }
    }

    /// Advance to the next occurrence of `quote` or `\`, returning the byte
    /// found, or `0` at end of input.
    pub fn skip_to_string_delim(&mut self, quote: u8) -> u8 {
        match memchr::memchr2(quote, b'\\', self.rest()) {
            Some(offset) => {
                self.pos += offset;
                self.current()
            }
            None => {
                self.pos = self.src.len();
                0
            }
        }
    }

    /// Advance to the next `]`, returning `false` when none remains (the
    /// cursor is then at end of input).
    pub fn skip_to_close_bracket(&mut self) -> bool {
        match memchr::memchr(b']', self.rest()) {
            Some(offset) => {
                self.pos += offset;
                true
            }
            None => {
                self.pos = self.src.len();
                false
            }
        }
    }
}
