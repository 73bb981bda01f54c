//! Constant propagation.
//!
//! `local NAME = LITERAL`, where the literal is a number or a quoted or
//! long string making up the whole initializer, registers a constant. Later
//! reads of `NAME` inside the declaring block are replaced by the literal.
//!
//! The pass is positional and errs toward leaving code alone:
//!
//! - a name bound more than once in the file (locals, parameters, `for`
//!   variables) is never propagated;
//! - a name assigned after its declaration is only propagated at top-level
//!   reads that come before the first such assignment, and not at all when
//!   an assignment sits inside a block or the file uses `goto`;
//! - reads that are indexed, called or assigned to keep the name.
//!
//! A declaration left without references is removed. Reads inside
//! backtick string interpolations count as references.

use std::ops::Range;

use luamod_lexer::interpolation::names;
use luamod_lexer::{next_significant, Token, TokenKind};
use rustc_hash::FxHashMap;

use crate::edit::{
    expect_symbol, has_postfix, is_assign_op, is_field, is_table_key, matching_close, next_code, prev_code,
    Frames, Splicer,
};

pub fn apply<'src>(tokens: &[Token<'src>]) -> (Vec<Token<'src>>, usize) {
    let facts = Facts::collect(tokens);
    let mut blocks: Vec<u32> = Vec::new();
    let mut next_block = 0u32;
    let mut active: FxHashMap<&str, Constant> = FxHashMap::default();
    let mut registered: Vec<Constant> = Vec::new();
    let mut substitutions: FxHashMap<usize, usize> = FxHashMap::default();

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Keyword => match token.text.as_ref() {
                "function" | "do" | "then" | "repeat" => {
                    blocks.push(next_block);
                    next_block += 1;
                }
                "end" | "until" | "elseif" | "else" => {
                    if let Some(closed) = blocks.pop() {
                        active.retain(|_, c| c.block != Some(closed));
                    }
                    if token.text == "else" {
                        blocks.push(next_block);
                        next_block += 1;
                    }
                }
                "local" => {
                    if let Some(constant) = constant_at(tokens, i, &facts, blocks.last().copied()) {
                        tracing::trace!(line = token.line, name = %tokens[constant.name].text, "constant registered");
                        active.insert(tokens[constant.name].text.as_ref(), constant);
                        registered.push(constant);
                    }
                }
                _ => {}
            },
            TokenKind::Identifier => {
                if let Some(constant) = active.get(token.text.as_ref()) {
                    if facts.substitutable(tokens, i, constant) {
                        substitutions.insert(i, constant.literal);
                    }
                }
            }
            _ => {}
        }
    }

    let mut removals: FxHashMap<usize, usize> = FxHashMap::default();
    for constant in &registered {
        let name = tokens[constant.name].text.as_ref();
        let referenced = tokens.iter().enumerate().any(|(j, t)| {
            let kept = t.kind == TokenKind::Identifier
                && t.text == name
                && matches!(facts.roles[j], Role::Use | Role::Assignment)
                && !substitutions.contains_key(&j);
            kept || interpolation_reads(t, name)
        });
        if !referenced {
            let span = removal_span(tokens, constant);
            tracing::trace!(line = tokens[constant.local].line, name, "dead declaration removed");
            removals.insert(span.start, span.end);
        }
    }

    let mut splicer = Splicer::new(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if let Some(&end) = removals.get(&i) {
            splicer.replace(std::iter::empty());
            i = end;
            continue;
        }
        if let Some(&literal) = substitutions.get(&i) {
            let value = &tokens[literal];
            splicer.replace([tokens[i].replaced(value.kind, value.text.clone())]);
        } else {
            splicer.push(tokens[i].clone());
        }
        i += 1;
    }
    let edits = splicer.edits();
    (splicer.finish(), edits)
}

#[derive(Clone, Copy, Debug)]
struct Constant {
    /// The `local` keyword.
    local: usize,
    name: usize,
    literal: usize,
    /// Declaring block; `None` at top level.
    block: Option<u32>,
}

/// `local NAME = LITERAL` at `i`, when `NAME` is bound only here.
fn constant_at(tokens: &[Token<'_>], i: usize, facts: &Facts<'_>, block: Option<u32>) -> Option<Constant> {
    let name = next_code(tokens, i + 1).filter(|&n| tokens[n].kind == TokenKind::Identifier)?;
    if facts.bindings.get(tokens[name].text.as_ref()) != Some(&1) {
        return None;
    }
    let eq = expect_symbol(tokens, name, "=")?;
    let literal = next_code(tokens, eq + 1)?;
    let value = &tokens[literal];
    let is_literal = match value.kind {
        TokenKind::Number => true,
        TokenKind::String => !value.text.starts_with('`'),
        _ => false,
    };
    if !is_literal || value.is_unterminated() || !ends_statement(tokens, literal) {
        return None;
    }
    Some(Constant {
        local: i,
        name,
        literal,
        block,
    })
}

/// `true` when a backtick string's `{...}` code reads `name`. Such reads
/// are never substituted, so they keep the declaration alive.
fn interpolation_reads(token: &Token<'_>, name: &str) -> bool {
    token.is_interpolated() && names(&token.text).into_iter().any(|r| &token.text[r] == name)
}

/// The initializer is exactly the literal: what follows starts a new
/// statement.
fn ends_statement(tokens: &[Token<'_>], literal: usize) -> bool {
    let Some(next) = next_significant(tokens, literal + 1) else {
        return true;
    };
    let token = &tokens[next];
    match token.kind {
        TokenKind::Identifier => true,
        TokenKind::Keyword => !matches!(token.text.as_ref(), "and" | "or"),
        TokenKind::Punctuation => token.text == ";",
        _ => false,
    }
}

/// The declaration with an optional `;`, its line's indentation when it
/// starts the line, and trailing blanks up to one newline.
fn removal_span(tokens: &[Token<'_>], constant: &Constant) -> Range<usize> {
    let mut start = constant.local;
    if start > 0
        && tokens[start - 1].kind == TokenKind::Whitespace
        && (start == 1 || tokens[start - 2].kind == TokenKind::Newline)
    {
        start -= 1;
    }
    let mut end = expect_symbol(tokens, constant.literal, ";").unwrap_or(constant.literal) + 1;
    while tokens.get(end).is_some_and(|t| t.kind == TokenKind::Whitespace) {
        end += 1;
    }
    if tokens.get(end).is_some_and(|t| t.kind == TokenKind::Newline) {
        end += 1;
    }
    start..end
}

// ─── Identifier roles ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    /// Not an identifier.
    Other,
    Field,
    Label,
    TableKey,
    /// Bound by `local`, a parameter list or a `for` header.
    Binding,
    Assignment,
    Use,
}

struct Facts<'a> {
    roles: Vec<Role>,
    /// Block depth at each token.
    depths: Vec<usize>,
    bindings: FxHashMap<&'a str, usize>,
    assignments: FxHashMap<&'a str, Vec<usize>>,
    has_goto: bool,
}

impl<'a> Facts<'a> {
    fn collect(tokens: &'a [Token<'_>]) -> Self {
        let mut roles = vec![Role::Other; tokens.len()];
        mark_bindings(tokens, &mut roles);

        let mut depths = Vec::with_capacity(tokens.len());
        let mut frames = Frames::default();
        let mut has_goto = false;
        for (i, token) in tokens.iter().enumerate() {
            depths.push(frames.block_depth());
            if token.kind == TokenKind::Identifier && roles[i] == Role::Other {
                roles[i] = classify(tokens, i, &frames);
            }
            has_goto |= token.is_keyword("goto");
            frames.step(token);
        }

        let mut bindings: FxHashMap<&str, usize> = FxHashMap::default();
        let mut assignments: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
        for (i, role) in roles.iter().enumerate() {
            let name = tokens[i].text.as_ref();
            match role {
                Role::Binding => *bindings.entry(name).or_default() += 1,
                Role::Assignment => assignments.entry(name).or_default().push(i),
                _ => {}
            }
        }
        Self {
            roles,
            depths,
            bindings,
            assignments,
            has_goto,
        }
    }

    fn substitutable(&self, tokens: &[Token<'_>], i: usize, constant: &Constant) -> bool {
        if self.roles[i] != Role::Use || has_postfix(tokens, i) {
            return false;
        }
        let name = tokens[i].text.as_ref();
        let mut later = self
            .assignments
            .get(name)
            .into_iter()
            .flatten()
            .copied()
            .filter(|&p| p > constant.name)
            .peekable();
        let Some(&first) = later.peek() else {
            return true;
        };
        let nested = later.any(|p| self.depths[p] > 0);
        !nested && !self.has_goto && self.depths[i] == 0 && i < first
    }
}

/// Marks names bound by `local`, `local function`, parameter lists and
/// `for` headers, and the target of a plain `function name()`.
fn mark_bindings(tokens: &[Token<'_>], roles: &mut [Role]) {
    for (i, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Keyword {
            continue;
        }
        match token.text.as_ref() {
            "local" => {
                let Some(next) = next_code(tokens, i + 1) else {
                    continue;
                };
                if tokens[next].is_keyword("function") {
                    if let Some(name) = next_code(tokens, next + 1).filter(|&n| tokens[n].kind == TokenKind::Identifier) {
                        roles[name] = Role::Binding;
                    }
                } else {
                    mark_name_list(tokens, i, roles);
                }
            }
            "for" => mark_name_list(tokens, i, roles),
            "function" => mark_function(tokens, i, roles),
            _ => {}
        }
    }
}

/// `a, b <const>, c` after the keyword at `keyword`.
fn mark_name_list(tokens: &[Token<'_>], keyword: usize, roles: &mut [Role]) {
    let mut cursor = next_code(tokens, keyword + 1);
    while let Some(name) = cursor.filter(|&n| tokens[n].kind == TokenKind::Identifier) {
        roles[name] = Role::Binding;
        let mut after = next_code(tokens, name + 1);
        if let Some(colon) = after.filter(|&a| tokens[a].is_symbol(":")) {
            after = skip_annotation(tokens, colon);
        }
        if let Some(lt) = after.filter(|&a| tokens[a].is_symbol("<")) {
            after = next_code(tokens, lt + 1)
                .and_then(|attr| expect_symbol(tokens, attr, ">"))
                .and_then(|gt| next_code(tokens, gt + 1));
        }
        cursor = after
            .filter(|&a| tokens[a].is_symbol(","))
            .and_then(|comma| next_code(tokens, comma + 1));
    }
}

fn mark_function(tokens: &[Token<'_>], keyword: usize, roles: &mut [Role]) {
    let mut cursor = next_code(tokens, keyword + 1);
    if let Some(name) = cursor.filter(|&n| tokens[n].kind == TokenKind::Identifier) {
        let is_local = prev_code(tokens, keyword).is_some_and(|p| tokens[p].is_keyword("local"));
        let mut last = name;
        while let Some(sep) = next_code(tokens, last + 1).filter(|&s| tokens[s].is_symbol(".") || tokens[s].is_symbol(":")) {
            match next_code(tokens, sep + 1).filter(|&n| tokens[n].kind == TokenKind::Identifier) {
                Some(field) => last = field,
                None => break,
            }
        }
        if last == name && !is_local {
            roles[name] = Role::Assignment;
        }
        cursor = next_code(tokens, last + 1);
    }
    // Luau generics: `function f<T>(x: T)`
    if let Some(lt) = cursor.filter(|&c| tokens[c].is_symbol("<")) {
        cursor = (lt + 1..tokens.len())
            .find(|&j| tokens[j].is_symbol(">"))
            .and_then(|gt| next_code(tokens, gt + 1));
    }
    let Some(open) = cursor.filter(|&o| tokens[o].is_symbol("(")) else {
        return;
    };
    let close = matching_close(tokens, open).unwrap_or(tokens.len());
    for j in open + 1..close {
        if tokens[j].kind == TokenKind::Identifier {
            roles[j] = Role::Binding;
        }
    }
}

/// Index of the `,` or `=` that ends the type annotation at `colon`;
/// `None` when the line ends first.
fn skip_annotation(tokens: &[Token<'_>], colon: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (j, token) in tokens.iter().enumerate().skip(colon + 1) {
        if token.kind == TokenKind::Newline {
            return None;
        }
        if !matches!(token.kind, TokenKind::Punctuation | TokenKind::Operator) {
            continue;
        }
        match token.text.as_ref() {
            "(" | "{" | "[" | "<" => depth += 1,
            ")" | "}" | "]" | ">" => depth = depth.saturating_sub(1),
            "," | "=" if depth == 0 => return Some(j),
            _ => {}
        }
    }
    None
}

fn classify(tokens: &[Token<'_>], i: usize, frames: &Frames) -> Role {
    if is_field(tokens, i) {
        return Role::Field;
    }
    let after_goto = prev_code(tokens, i).is_some_and(|p| tokens[p].is_keyword("goto"));
    let in_label = prev_code(tokens, i).is_some_and(|p| tokens[p].is_symbol("::"))
        && expect_symbol(tokens, i, "::").is_some();
    if after_goto || in_label {
        return Role::Label;
    }
    if is_table_key(tokens, i, frames) {
        return Role::TableKey;
    }
    if frames.at_statement_level() && is_assignment_target(tokens, i) {
        return Role::Assignment;
    }
    Role::Use
}

/// `name = ...`, `name += ...`, or `name` in a target list `a, b.c, name = ...`.
fn is_assignment_target(tokens: &[Token<'_>], i: usize) -> bool {
    let mut last = i;
    loop {
        let Some(next) = next_code(tokens, last + 1) else {
            return false;
        };
        if is_assign_op(&tokens[next]) {
            return true;
        }
        if !tokens[next].is_symbol(",") {
            return false;
        }
        let Some(target) = next_code(tokens, next + 1).filter(|&t| tokens[t].kind == TokenKind::Identifier) else {
            return false;
        };
        last = target;
        while let Some(field) = expect_symbol(tokens, last, ".")
            .and_then(|dot| next_code(tokens, dot + 1))
            .filter(|&f| tokens[f].kind == TokenKind::Identifier)
        {
            last = field;
        }
    }
}
