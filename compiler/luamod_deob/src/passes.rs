//! The rewrite passes, in pipeline order.
//!
//! Every pass maps a token stream to a rewritten stream plus the number of
//! edits it made. Passes never fail: a fragment they cannot rewrite safely
//! is copied through unchanged.

use std::fmt;

use luamod_lexer::{NameTables, Token};

pub(crate) mod byte_codes;
pub(crate) mod char_codes;
pub(crate) mod cleanup;
pub(crate) mod concat;
pub(crate) mod escapes;
pub(crate) mod fold;
pub(crate) mod inline;
pub(crate) mod parens;
pub(crate) mod propagate;
pub(crate) mod rename;

/// One rewrite pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pass {
    /// `string.char(72, 105)` to `"Hi"`.
    CharCodes,
    /// `string.byte("A")` and `("A"):byte()` to `65`.
    ByteCodes,
    /// Numeric escapes inside string literals decoded.
    Escapes,
    /// `load("...")` payloads inlined as functions.
    Inline,
    /// Pure numeric expressions evaluated.
    Fold,
    /// Adjacent string literals merged.
    Concat,
    /// Constant locals substituted into their uses.
    Propagate,
    /// Redundant parens around string literals dropped.
    Parens,
    /// Machine-generated names replaced by `var_N` / `func_N`.
    Rename,
    /// Repeated semicolons and blank lines collapsed.
    Cleanup,
}

impl Pass {
    /// Passes run on every pipeline invocation, in order.
    pub const CORE: [Pass; 8] = [
        Pass::CharCodes,
        Pass::ByteCodes,
        Pass::Escapes,
        Pass::Inline,
        Pass::Fold,
        Pass::Concat,
        Pass::Propagate,
        Pass::Parens,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pass::CharCodes => "char-codes",
            Pass::ByteCodes => "byte-codes",
            Pass::Escapes => "escapes",
            Pass::Inline => "inline",
            Pass::Fold => "fold",
            Pass::Concat => "concat",
            Pass::Propagate => "propagate",
            Pass::Parens => "parens",
            Pass::Rename => "rename",
            Pass::Cleanup => "cleanup",
        }
    }

    /// Run the pass. `budget` is the remaining inline depth and only
    /// matters to [`Pass::Inline`].
    pub(crate) fn apply<'src>(self, tokens: &[Token<'src>], budget: u32) -> (Vec<Token<'src>>, usize) {
        match self {
            Pass::CharCodes => char_codes::apply(tokens),
            Pass::ByteCodes => byte_codes::apply(tokens),
            Pass::Escapes => escapes::apply(tokens),
            Pass::Inline => inline::apply(tokens, budget),
            Pass::Fold => fold::apply(tokens),
            Pass::Concat => concat::apply(tokens),
            Pass::Propagate => propagate::apply(tokens),
            Pass::Parens => parens::apply(tokens),
            Pass::Rename => rename::apply(tokens, NameTables::lua()),
            Pass::Cleanup => cleanup::apply(tokens),
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
