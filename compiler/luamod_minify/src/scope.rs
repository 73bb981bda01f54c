//! Scope analysis.
//!
//! An approximation of Lua's lexical scoping: a stack of name sets pushed
//! on `function`, `do`, `if`, `for`, `while`, `repeat` and popped on
//! `end`/`until`. A popped scope's names are merged into its parent rather
//! than discarded, so a name declared in any block stays a known local for
//! the rest of the file. This can only widen the set of names treated as
//! locals; renaming applies to every occurrence of a name, so a wider set
//! never separates two occurrences that refer to the same binding.

use std::collections::BTreeSet;

use luamod_lexer::{next_significant, NameTables, Token, TokenKind};
use rustc_hash::FxHashSet;

const SCOPE_OPENERS: &[&str] = &["function", "do", "if", "for", "while", "repeat"];

/// Stack of per-block declared names.
pub struct ScopeStack<'src> {
    scopes: Vec<FxHashSet<&'src str>>,
}

impl<'src> ScopeStack<'src> {
    pub fn new() -> Self {
        Self {
            scopes: vec![FxHashSet::default()],
        }
    }

    pub fn push(&mut self) {
        self.scopes.push(FxHashSet::default());
    }

    /// Pop the innermost scope into its parent. The outermost scope is
    /// never popped.
    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            if let Some(inner) = self.scopes.pop() {
                if let Some(parent) = self.scopes.last_mut() {
                    parent.extend(inner);
                }
            }
        }
    }

    pub fn declare(&mut self, name: &'src str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name);
        }
    }

    /// Every declared name across all remaining scopes.
    pub fn into_names(self) -> BTreeSet<String> {
        self.scopes
            .into_iter()
            .flatten()
            .map(str::to_owned)
            .collect()
    }
}

impl Default for ScopeStack<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Names declared by `local a, b, ...` and `local function f`, excluding
/// allow-listed globals, sorted.
pub fn analyze(tokens: &[Token<'_>]) -> BTreeSet<String> {
    analyze_with(tokens, NameTables::lua())
}

/// [`analyze`] against explicit name tables.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn analyze_with<'src>(tokens: &[Token<'src>], tables: &NameTables) -> BTreeSet<String> {
    let mut stack = ScopeStack::new();
    for (i, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Keyword {
            continue;
        }
        match token.text.as_ref() {
            kw if SCOPE_OPENERS.contains(&kw) => stack.push(),
            "end" | "until" => stack.pop(),
            "local" => {
                for name in declared_names(tokens, i + 1) {
                    if !tables.is_global(name) {
                        stack.declare(name);
                    }
                }
            }
            _ => {}
        }
    }
    let names = stack.into_names();
    tracing::debug!(locals = names.len(), "scope analysis");
    names
}

/// Names introduced by the `local` whose following token index is `from`.
fn declared_names<'a, 'src>(tokens: &'a [Token<'src>], from: usize) -> Vec<&'a str> {
    let mut names = Vec::new();
    let mut at = next_significant(tokens, from);
    if let Some(i) = at {
        if tokens[i].is_keyword("function") {
            at = next_significant(tokens, i + 1);
            if let Some(j) = at.filter(|&j| tokens[j].kind == TokenKind::Identifier) {
                names.push(tokens[j].text.as_ref());
            }
            return names;
        }
    }
    while let Some(i) = at {
        if tokens[i].kind != TokenKind::Identifier {
            break;
        }
        names.push(tokens[i].text.as_ref());
        match next_significant(tokens, i + 1) {
            Some(j) if tokens[j].is_symbol(",") => at = next_significant(tokens, j + 1),
            _ => break,
        }
    }
    names
}
