//! Token-stream formatter.
//!
//! Layout comes from three sources: newline tokens in the input (at most
//! one blank line survives), forced breaks before statement keywords, and
//! the depth tracker's per-token depth for indentation. Horizontal spacing
//! is decided per token pair by the [`spacing`](crate::spacing) rules, with
//! the lexer's glue check as a backstop. Spaces are emitted lazily, so the
//! formatter never writes trailing whitespace of its own; comment and string
//! text is copied verbatim.

use luamod_lexer::{needs_separator, Token, TokenKind};

use crate::depth::{annotate, DepthAnnotated};
use crate::emitter::{Emitter, StringEmitter};
use crate::spacing::{lookup_spacing, TokenCategory};

/// Formatter configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatConfig {
    /// Text emitted once per depth level at the start of a line.
    pub indent: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent: "\t".to_owned(),
        }
    }
}

impl FormatConfig {
    /// Indent with `n` spaces per level.
    pub fn spaces(n: usize) -> Self {
        Self {
            indent: " ".repeat(n),
        }
    }
}

/// Keywords that start a new line when they appear mid-line.
const LINE_START_KEYWORDS: &[&str] =
    &["function", "if", "for", "while", "repeat", "else", "elseif"];

/// Renders depth-annotated tokens through an [`Emitter`].
pub struct Formatter<'t, 'src, E: Emitter> {
    tokens: &'t [Token<'src>],
    annotated: &'t DepthAnnotated,
    indent: &'t str,
    out: E,
    /// Newline tokens seen since the last emitted token.
    pending_newlines: u32,
    at_line_start: bool,
    wrote_any: bool,
    /// Last emitted token, comments included, with its category.
    last: Option<(&'t Token<'src>, TokenCategory)>,
    /// Last emitted token that is not a comment.
    last_code: Option<&'t Token<'src>>,
}

impl<'t, 'src, E: Emitter> Formatter<'t, 'src, E> {
    pub fn new(
        tokens: &'t [Token<'src>],
        annotated: &'t DepthAnnotated,
        indent: &'t str,
        out: E,
    ) -> Self {
        Self {
            tokens,
            annotated,
            indent,
            out,
            pending_newlines: 0,
            at_line_start: true,
            wrote_any: false,
            last: None,
            last_code: None,
        }
    }

    /// Emit every token and return the emitter.
    pub fn run(mut self) -> E {
        let tokens = self.tokens;
        for (i, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Whitespace => {}
                TokenKind::Newline => {
                    if self.wrote_any {
                        self.pending_newlines += 1;
                        self.at_line_start = true;
                    }
                }
                _ => {
                    let depth = self.annotated.depths.get(i).copied().unwrap_or(0);
                    self.emit_token(token, depth);
                }
            }
        }
        self.out
    }

    fn emit_token(&mut self, token: &'t Token<'src>, depth: u32) {
        if !self.at_line_start && self.breaks_before(token) {
            self.pending_newlines = self.pending_newlines.max(1);
            self.at_line_start = true;
        }

        if self.at_line_start {
            if self.wrote_any {
                for _ in 0..self.pending_newlines.clamp(1, 2) {
                    self.out.emit_newline();
                }
            }
            self.out.emit_indent(self.indent, depth);
        } else if let Some((last, last_cat)) = self.last {
            if self.wants_space(last, last_cat, token) {
                self.out.emit_space();
            }
        }

        self.out.emit(&token.text);
        self.pending_newlines = 0;
        self.at_line_start = false;
        self.wrote_any = true;
        self.last = Some((token, TokenCategory::of(token, self.last_code)));
        if token.kind != TokenKind::Comment {
            self.last_code = Some(token);
        }
    }

    fn wants_space(&self, left: &Token<'_>, left_cat: TokenCategory, right: &Token<'_>) -> bool {
        let right_cat = TokenCategory::of(right, self.last_code);
        lookup_spacing(left_cat, right_cat).needs_space() || needs_separator(left, right)
    }

    fn breaks_before(&self, token: &Token<'_>) -> bool {
        if token.kind != TokenKind::Keyword || !LINE_START_KEYWORDS.contains(&token.text.as_ref())
        {
            return false;
        }
        let expression_keyword = token.text == "function" || token.text == "if";
        !(expression_keyword && self.in_expression_position())
    }

    /// `true` after tokens that expect an expression next.
    fn in_expression_position(&self) -> bool {
        let Some(prev) = self.last_code else {
            return false;
        };
        match prev.kind {
            TokenKind::Operator => true,
            TokenKind::Keyword => matches!(prev.text.as_ref(), "local" | "return"),
            TokenKind::Punctuation => matches!(prev.text.as_ref(), "(" | "," | "{" | "["),
            _ => false,
        }
    }
}

/// Format `tokens` indenting with `indent_unit` per depth level.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn format(tokens: &[Token<'_>], indent_unit: &str) -> String {
    let annotated = annotate(tokens);
    let mut out = Formatter::new(
        tokens,
        &annotated,
        indent_unit,
        StringEmitter::with_capacity(tokens.len() * 4),
    )
    .run();
    out.finish_with_newline();
    let text = out.output();
    tracing::debug!(bytes = text.len(), open_depth = annotated.open_depth, "formatted");
    text
}

/// Format `tokens` with `config`.
pub fn format_with(tokens: &[Token<'_>], config: &FormatConfig) -> String {
    format(tokens, &config.indent)
}

/// Tokenize and format Lua source.
pub fn format_source(source: &str, config: &FormatConfig) -> String {
    format_with(&luamod_lexer::tokenize(source), config)
}

#[cfg(test)]
mod tests;
