//! The minification pipeline.
//!
//! ```text
//! tokens ──► strip comments ──► [aggressive rewrites] ──► [rename] ──► serialize
//! ```

use std::borrow::Cow;

use luamod_lexer::interpolation::{names, rename_names};
use luamod_lexer::{next_significant, prev_significant, tokenize_with, NameTables, Token, TokenKind};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::canonical;
use crate::rename::RenameMap;
use crate::scope::analyze_with;
use crate::serialize::serialize;

/// Which optional rewrites [`minify_with`] performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinifyOptions {
    /// Rename scope-local names to short generated names.
    pub rename_locals: bool,
    /// Canonicalize literals and drop redundant semicolons.
    pub aggressive: bool,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            rename_locals: true,
            aggressive: true,
        }
    }
}

/// Size before and after a minification run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MinifyStats {
    pub original_bytes: usize,
    pub minified_bytes: usize,
}

impl MinifyStats {
    pub fn new(original: &str, minified: &str) -> Self {
        Self {
            original_bytes: original.len(),
            minified_bytes: minified.len(),
        }
    }

    /// Bytes saved as a percentage of the original size; `0.0` for empty
    /// input.
    #[allow(clippy::cast_precision_loss, reason = "file sizes fit an f64 mantissa")]
    pub fn reduction_percent(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        let saved = self.original_bytes as f64 - self.minified_bytes as f64;
        saved / self.original_bytes as f64 * 100.0
    }
}

/// Minify a token stream.
///
/// Comments are always removed. The result re-lexes to the same
/// significant tokens, modulo the enabled rewrites.
pub fn minify(tokens: &[Token<'_>], rename_locals: bool, aggressive: bool) -> String {
    minify_with(
        tokens,
        MinifyOptions {
            rename_locals,
            aggressive,
        },
        NameTables::lua(),
    )
}

/// Tokenize and minify `source` with default options.
pub fn minify_source(source: &str) -> String {
    let tables = NameTables::lua();
    minify_with(&tokenize_with(source, tables), MinifyOptions::default(), tables)
}

/// [`minify`] with explicit options and name tables.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn minify_with(tokens: &[Token<'_>], options: MinifyOptions, tables: &NameTables) -> String {
    let mut work: Vec<Token<'_>> = tokens
        .iter()
        .filter(|t| !t.is_trivia())
        .cloned()
        .collect();
    if options.aggressive {
        canonicalize_literals(&mut work);
        work = drop_semicolons(work);
    }
    if options.rename_locals {
        let map = rename_map(&work, tables);
        tracing::debug!(renamed = map.len(), "rename map built");
        apply_renames(&mut work, &map);
    }
    let out = serialize(&work);
    tracing::debug!(bytes = out.len(), "minified");
    out
}

// ─── Nesting ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Frame {
    Paren,
    Bracket,
    Brace,
    Block,
}

type Frames = SmallVec<[Frame; 16]>;

fn update_frames(frames: &mut Frames, token: &Token<'_>) {
    let close = |frames: &mut Frames, frame| {
        if frames.last() == Some(&frame) {
            frames.pop();
        }
    };
    match (token.kind, token.text.as_ref()) {
        (TokenKind::Punctuation, "(") => frames.push(Frame::Paren),
        (TokenKind::Punctuation, "[") => frames.push(Frame::Bracket),
        (TokenKind::Punctuation, "{") => frames.push(Frame::Brace),
        (TokenKind::Punctuation, ")") => close(frames, Frame::Paren),
        (TokenKind::Punctuation, "]") => close(frames, Frame::Bracket),
        (TokenKind::Punctuation, "}") => close(frames, Frame::Brace),
        (TokenKind::Keyword, "function" | "do" | "then" | "repeat") => frames.push(Frame::Block),
        (TokenKind::Keyword, "end" | "until" | "elseif") => close(frames, Frame::Block),
        _ => {}
    }
}

// ─── Aggressive rewrites ────────────────────────────────────────────────

fn canonicalize_literals(tokens: &mut [Token<'_>]) {
    for token in tokens {
        let rewritten = match token.kind {
            TokenKind::Number => canonical::number(&token.text),
            TokenKind::String => canonical::string(&token.text),
            _ => continue,
        };
        if rewritten != token.text {
            token.text = Cow::Owned(rewritten);
        }
    }
}

/// Drop statement `;` unless the next token is a keyword or `(`, where
/// removing it could join two statements into one call. Field separators
/// inside table constructors are kept.
fn drop_semicolons(tokens: Vec<Token<'_>>) -> Vec<Token<'_>> {
    let mut frames: Frames = SmallVec::new();
    let mut keep = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        update_frames(&mut frames, token);
        let needed = !token.is_symbol(";")
            || frames.last() == Some(&Frame::Brace)
            || tokens
                .get(i + 1)
                .is_some_and(|next| next.kind == TokenKind::Keyword || next.is_symbol("("));
        keep.push(needed);
    }
    tokens
        .into_iter()
        .zip(keep)
        .filter_map(|(token, keep)| keep.then_some(token))
        .collect()
}

// ─── Renaming ───────────────────────────────────────────────────────────

fn rename_map(tokens: &[Token<'_>], tables: &NameTables) -> RenameMap {
    let locals = analyze_with(tokens, tables);
    let mut in_use: FxHashSet<&str> = FxHashSet::default();
    for token in tokens {
        if token.kind == TokenKind::Identifier {
            in_use.insert(&token.text);
        } else if token.is_interpolated() {
            in_use.extend(names(&token.text).into_iter().map(|r| &token.text[r]));
        }
    }
    in_use.retain(|name| !locals.contains(*name));
    RenameMap::build(&locals, &in_use, tables)
}

/// Rewrite every renamable identifier occurrence in place.
///
/// Field names after `.`/`:` and keys of `{ name = value }` constructors
/// are not variable references and keep their spelling. Names read inside
/// backtick string interpolations are renamed in place.
fn apply_renames(tokens: &mut [Token<'_>], map: &RenameMap) {
    if map.is_empty() {
        return;
    }
    let mut frames: Frames = SmallVec::new();
    for i in 0..tokens.len() {
        update_frames(&mut frames, &tokens[i]);
        if tokens[i].is_interpolated() {
            if let Some(text) = rename_names(&tokens[i].text, |name| map.get(name)) {
                tokens[i].text = Cow::Owned(text);
            }
            continue;
        }
        if tokens[i].kind != TokenKind::Identifier {
            continue;
        }
        let Some(short) = map.get(&tokens[i].text) else {
            continue;
        };
        if is_field_name(tokens, i) || is_table_key(tokens, i, &frames) {
            continue;
        }
        tracing::trace!(from = %tokens[i].text, to = short, "rename");
        tokens[i].text = Cow::Owned(short.to_owned());
    }
}

fn is_field_name(tokens: &[Token<'_>], i: usize) -> bool {
    prev_significant(tokens, i).is_some_and(|p| tokens[p].is_symbol(".") || tokens[p].is_symbol(":"))
}

/// `name` in `{ name = value }`: directly inside a brace, after `{`, `,`
/// or `;`, and followed by a single `=`.
fn is_table_key(tokens: &[Token<'_>], i: usize, frames: &[Frame]) -> bool {
    if frames.last() != Some(&Frame::Brace) {
        return false;
    }
    let after_separator = prev_significant(tokens, i)
        .is_some_and(|p| ["{", ",", ";"].iter().any(|s| tokens[p].is_symbol(s)));
    let before_assign = next_significant(tokens, i + 1).is_some_and(|n| tokens[n].is_symbol("="));
    after_separator && before_assign
}
