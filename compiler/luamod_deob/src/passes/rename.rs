//! Readable names for machine-generated ones.
//!
//! A name looks generated when it is a single character, only underscores,
//! a run of three or more look-alike characters (`l I 1 O 0 _`), or longer
//! than fifteen characters without a vowel. Each such name becomes
//! `func_N` when first seen right after `function`, `var_N` otherwise,
//! numbered in order of first appearance and skipping names the file
//! already uses.
//!
//! Fields, method names, table constructor keys and names from the global
//! allow-list are never renamed. Reads inside backtick string
//! interpolations are renamed along with the code around them.

use std::sync::OnceLock;

use luamod_lexer::interpolation::{names, rename_names};
use luamod_lexer::{NameTables, Token, TokenKind};
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::edit::{is_field, is_table_key, prev_code, Frames, Splicer};

fn look_alike() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::expect_used, reason = "the pattern is a compile-time constant")]
        Regex::new(r"^[lI1O0_]{3,}$").expect("look-alike pattern is valid")
    })
}

/// `true` when `name` looks machine generated.
pub fn is_obfuscated(name: &str) -> bool {
    name.len() == 1
        || name.bytes().all(|b| b == b'_')
        || look_alike().is_match(name)
        || (name.len() > 15 && !name.bytes().any(|b| b"aeiouAEIOU".contains(&b)))
}

pub fn apply<'src>(tokens: &[Token<'src>], tables: &NameTables) -> (Vec<Token<'src>>, usize) {
    let renames = plan(tokens, tables);
    if renames.is_empty() {
        return (tokens.to_vec(), 0);
    }
    let mut frames = Frames::default();
    let mut splicer = Splicer::new(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        let target = if is_variable(tokens, i, &frames) {
            renames.get(token.text.as_ref()).cloned()
        } else if token.is_interpolated() {
            rename_names(&token.text, |name| renames.get(name).map(String::as_str))
        } else {
            None
        };
        match target {
            Some(text) => splicer.replace([token.replaced(token.kind, text)]),
            None => splicer.push(token.clone()),
        }
        frames.step(token);
    }
    let edits = splicer.edits();
    (splicer.finish(), edits)
}

/// Old name to new name, in order of first appearance.
fn plan<'a>(tokens: &'a [Token<'_>], tables: &NameTables) -> FxHashMap<&'a str, String> {
    let mut taken: FxHashSet<&str> = FxHashSet::default();
    for token in tokens {
        if token.kind == TokenKind::Identifier {
            taken.insert(&token.text);
        } else if token.is_interpolated() {
            taken.extend(names(&token.text).into_iter().map(|r| &token.text[r]));
        }
    }
    let mut renames: FxHashMap<&str, String> = FxHashMap::default();
    let mut vars = Counter::new("var");
    let mut funcs = Counter::new("func");
    let mut frames = Frames::default();
    for (i, token) in tokens.iter().enumerate() {
        let name = token.text.as_ref();
        if is_variable(tokens, i, &frames)
            && !renames.contains_key(name)
            && !tables.is_reserved(name)
            && is_obfuscated(name)
        {
            let after_function = prev_code(tokens, i).is_some_and(|p| tokens[p].is_keyword("function"));
            let counter = if after_function { &mut funcs } else { &mut vars };
            let fresh = counter.next(&taken);
            tracing::trace!(line = token.line, from = name, to = %fresh, "name restored");
            renames.insert(name, fresh);
        }
        frames.step(token);
    }
    renames
}

fn is_variable(tokens: &[Token<'_>], i: usize, frames: &Frames) -> bool {
    tokens[i].kind == TokenKind::Identifier && !is_field(tokens, i) && !is_table_key(tokens, i, frames)
}

struct Counter {
    prefix: &'static str,
    next: usize,
}

impl Counter {
    fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 1 }
    }

    fn next(&mut self, taken: &FxHashSet<&str>) -> String {
        loop {
            let name = format!("{}_{}", self.prefix, self.next);
            self.next += 1;
            if !taken.contains(name.as_str()) {
                return name;
            }
        }
    }
}
