//! Token stream editing shared by the rewrite passes.
//!
//! Passes match patterns over *code* tokens: whitespace and newlines are
//! skipped, comments are not. A pattern therefore never matches across a
//! comment, and a rewritten span never swallows one.

use std::ops::Range;

use luamod_lexer::{needs_separator, tokenize, Token, TokenKind};

// ─── Navigation ─────────────────────────────────────────────────────────

#[inline]
pub(crate) fn is_blank(token: &Token<'_>) -> bool {
    matches!(token.kind, TokenKind::Whitespace | TokenKind::Newline)
}

/// Index of the first non-blank token at or after `from`.
pub(crate) fn next_code(tokens: &[Token<'_>], from: usize) -> Option<usize> {
    (from..tokens.len()).find(|&i| !is_blank(&tokens[i]))
}

/// Index of the closest non-blank token before `before`.
pub(crate) fn prev_code(tokens: &[Token<'_>], before: usize) -> Option<usize> {
    (0..before.min(tokens.len())).rev().find(|&i| !is_blank(&tokens[i]))
}

/// Next code token after `i`, if it is the symbol `sym`.
pub(crate) fn expect_symbol(tokens: &[Token<'_>], i: usize, sym: &str) -> Option<usize> {
    next_code(tokens, i + 1).filter(|&j| tokens[j].is_symbol(sym))
}

/// Next code token after `i`, if it is the identifier `name`.
pub(crate) fn expect_ident(tokens: &[Token<'_>], i: usize, name: &str) -> Option<usize> {
    next_code(tokens, i + 1).filter(|&j| tokens[j].is_ident(name))
}

/// `true` when `token` can end an operand. A `(`, string or `{` right
/// after such a token continues the expression as a call.
pub(crate) fn ends_operand(token: &Token<'_>) -> bool {
    match token.kind {
        TokenKind::Identifier | TokenKind::Number | TokenKind::String => true,
        TokenKind::Keyword => matches!(token.text.as_ref(), "true" | "false" | "nil" | "end"),
        TokenKind::Operator => token.text == "...",
        TokenKind::Punctuation => matches!(token.text.as_ref(), ")" | "]" | "}"),
        _ => false,
    }
}

/// `true` when `token` continues the expression before it: field or
/// method access, indexing, or a call.
pub(crate) fn starts_postfix(token: &Token<'_>) -> bool {
    match token.kind {
        TokenKind::String => true,
        TokenKind::Punctuation => matches!(token.text.as_ref(), "." | ":" | "[" | "(" | "{"),
        _ => false,
    }
}

/// `true` when the token at `i` is preceded by an operand, so a bracket
/// or string at `i` is a call or index rather than a new expression.
pub(crate) fn follows_operand(tokens: &[Token<'_>], i: usize) -> bool {
    prev_code(tokens, i).is_some_and(|p| ends_operand(&tokens[p]))
}

/// `true` when the code token after `i` continues the expression.
pub(crate) fn has_postfix(tokens: &[Token<'_>], i: usize) -> bool {
    next_code(tokens, i + 1).is_some_and(|n| starts_postfix(&tokens[n]))
}

/// `true` for a name used as a field: right after `.` or `:`.
pub(crate) fn is_field(tokens: &[Token<'_>], i: usize) -> bool {
    prev_code(tokens, i).is_some_and(|p| tokens[p].is_symbol(".") || tokens[p].is_symbol(":"))
}

/// Global-library access `lib.func` whose `lib` starts at `i` and is not
/// itself a field. Returns the index of `func`.
pub(crate) fn library_call(tokens: &[Token<'_>], i: usize, lib: &str, func: &str) -> Option<usize> {
    if !tokens[i].is_ident(lib) || is_field(tokens, i) {
        return None;
    }
    let dot = expect_symbol(tokens, i, ".")?;
    expect_ident(tokens, dot, func)
}

/// Luau compound assignments included.
pub(crate) const ASSIGN_OPS: &[&str] = &["=", "+=", "-=", "*=", "/=", "//=", "%=", "^=", "..="];

pub(crate) fn is_assign_op(token: &Token<'_>) -> bool {
    token.kind == TokenKind::Operator && ASSIGN_OPS.contains(&token.text.as_ref())
}

// ─── Nesting ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Frame {
    Paren,
    Bracket,
    Brace,
    Block,
}

/// Bracket and block nesting, advanced one token at a time.
///
/// `function`, `do`, `then` and `repeat` open a block; `end`, `until` and
/// `elseif` close one. Closers that do not match the innermost frame are
/// ignored.
#[derive(Clone, Debug, Default)]
pub(crate) struct Frames {
    stack: Vec<Frame>,
}

impl Frames {
    pub(crate) fn step(&mut self, token: &Token<'_>) {
        let opened = match (token.kind, token.text.as_ref()) {
            (TokenKind::Punctuation, "(") => Some(Frame::Paren),
            (TokenKind::Punctuation, "[") => Some(Frame::Bracket),
            (TokenKind::Punctuation, "{") => Some(Frame::Brace),
            (TokenKind::Keyword, "function" | "do" | "then" | "repeat") => Some(Frame::Block),
            _ => None,
        };
        if let Some(frame) = opened {
            self.stack.push(frame);
            return;
        }
        let closed = match (token.kind, token.text.as_ref()) {
            (TokenKind::Punctuation, ")") => Frame::Paren,
            (TokenKind::Punctuation, "]") => Frame::Bracket,
            (TokenKind::Punctuation, "}") => Frame::Brace,
            (TokenKind::Keyword, "end" | "until" | "elseif") => Frame::Block,
            _ => return,
        };
        if self.stack.last() == Some(&closed) {
            self.stack.pop();
        }
    }

    /// Directly inside a block or at top level, where statements live.
    pub(crate) fn at_statement_level(&self) -> bool {
        matches!(self.stack.last(), None | Some(Frame::Block))
    }

    pub(crate) fn in_table(&self) -> bool {
        self.stack.last() == Some(&Frame::Brace)
    }

    /// Number of enclosing blocks.
    pub(crate) fn block_depth(&self) -> usize {
        self.stack.iter().filter(|&&f| f == Frame::Block).count()
    }
}

/// `name` in `{ name = value }`: inside a table constructor, after `{`,
/// `,` or `;`, and followed by `=`.
pub(crate) fn is_table_key(tokens: &[Token<'_>], i: usize, frames: &Frames) -> bool {
    frames.in_table()
        && prev_code(tokens, i).is_some_and(|p| ["{", ",", ";"].iter().any(|s| tokens[p].is_symbol(s)))
        && expect_symbol(tokens, i, "=").is_some()
}

// ─── Brackets and argument lists ────────────────────────────────────────

fn closer_of(open: &str) -> Option<&'static str> {
    match open {
        "(" => Some(")"),
        "[" => Some("]"),
        "{" => Some("}"),
        _ => None,
    }
}

/// Index of the bracket that closes the one at `open`. `None` when the
/// brackets in between do not nest.
pub(crate) fn matching_close(tokens: &[Token<'_>], open: usize) -> Option<usize> {
    let mut stack: Vec<&'static str> = vec![closer_of(tokens.get(open)?.text.as_ref())?];
    for (i, token) in tokens.iter().enumerate().skip(open + 1) {
        if token.kind != TokenKind::Punctuation {
            continue;
        }
        let text = token.text.as_ref();
        if let Some(close) = closer_of(text) {
            stack.push(close);
        } else if matches!(text, ")" | "]" | "}") {
            if stack.pop() != Some(text) {
                return None;
            }
            if stack.is_empty() {
                return Some(i);
            }
        }
    }
    None
}

/// Top-level items between the brackets at `open` and `close`, split on
/// any of `separators` and trimmed to code tokens. A single trailing
/// separator is allowed when `trailing` is set. `None` for an empty item.
pub(crate) fn split_items(
    tokens: &[Token<'_>],
    open: usize,
    close: usize,
    separators: &[&str],
    trailing: bool,
) -> Option<Vec<Range<usize>>> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = open + 1;
    for i in open + 1..close {
        let token = &tokens[i];
        if token.kind != TokenKind::Punctuation {
            continue;
        }
        match token.text.as_ref() {
            "(" | "[" | "{" => depth += 1,
            ")" | "]" | "}" => depth = depth.saturating_sub(1),
            sep if depth == 0 && separators.contains(&sep) => {
                items.push(trim(tokens, start..i)?);
                start = i + 1;
            }
            _ => {}
        }
    }
    match trim(tokens, start..close) {
        Some(last) => items.push(last),
        None if items.is_empty() || trailing => {}
        None => return None,
    }
    Some(items)
}

/// `range` without leading and trailing blanks; `None` when nothing
/// is left.
fn trim(tokens: &[Token<'_>], range: Range<usize>) -> Option<Range<usize>> {
    let start = next_code(tokens, range.start).filter(|&s| s < range.end)?;
    let end = prev_code(tokens, range.end)?;
    Some(start..end + 1)
}

/// The only code token in `range`, if there is exactly one.
pub(crate) fn single(tokens: &[Token<'_>], range: &Range<usize>) -> Option<usize> {
    let mut code = range.clone().filter(|&i| !is_blank(&tokens[i]));
    let first = code.next()?;
    code.next().is_none().then_some(first)
}

// ─── Splicing ───────────────────────────────────────────────────────────

/// Builds a pass's output by copying input tokens and splicing in
/// replacements. A space is inserted wherever a replacement would
/// otherwise fuse with its neighbour.
pub(crate) struct Splicer<'src> {
    out: Vec<Token<'src>>,
    after_edit: bool,
    edits: usize,
}

impl<'src> Splicer<'src> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
            after_edit: false,
            edits: 0,
        }
    }

    pub(crate) fn push(&mut self, token: Token<'src>) {
        if self.after_edit && !token.is_trivia() {
            self.glue(&token);
            self.after_edit = false;
        } else if is_blank(&token) {
            self.after_edit = false;
        }
        self.out.push(token);
    }

    pub(crate) fn replace(&mut self, replacement: impl IntoIterator<Item = Token<'src>>) {
        let mut first = true;
        for token in replacement {
            if first && !token.is_trivia() {
                self.glue(&token);
            }
            first = false;
            self.out.push(token);
        }
        self.after_edit = true;
        self.edits += 1;
    }

    fn glue(&mut self, next: &Token<'_>) {
        let Some(last) = self.out.last() else {
            return;
        };
        if last.is_trivia() {
            return;
        }
        if needs_separator(last, next) {
            self.out.push(Token::synthetic(TokenKind::Whitespace, " "));
        }
    }

    pub(crate) fn edits(&self) -> usize {
        self.edits
    }

    pub(crate) fn finish(self) -> Vec<Token<'src>> {
        self.out
    }
}

/// Lex `text` into tokens that own their text, for splicing into a
/// stream borrowed from other source.
pub(crate) fn owned_tokens<'src>(text: &str) -> Vec<Token<'src>> {
    tokenize(text)
        .into_iter()
        .map(|t| -> Token<'src> { t.into_owned() })
        .collect()
}

/// Left-to-right rewrite: at each index `rewrite_at` may claim the span
/// `i..end` and supply its replacement. Claimed spans never overlap.
pub(crate) fn rewrite<'src, F>(tokens: &[Token<'src>], mut rewrite_at: F) -> (Vec<Token<'src>>, usize)
where
    F: FnMut(&[Token<'src>], usize) -> Option<(usize, Vec<Token<'src>>)>,
{
    let mut splicer = Splicer::new(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        match rewrite_at(tokens, i) {
            Some((end, replacement)) if end > i => {
                splicer.replace(replacement);
                i = end;
            }
            _ => {
                splicer.push(tokens[i].clone());
                i += 1;
            }
        }
    }
    let edits = splicer.edits();
    (splicer.finish(), edits)
}

#[cfg(test)]
mod tests;
