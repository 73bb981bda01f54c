//! Findings reported by [`validate`](crate::validate).

use thiserror::Error;

/// A structural problem that makes the source unsafe to transform.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("[Syntax] Block structure error: unterminated {what} starting at line {line}")]
    Unterminated { what: &'static str, line: u32 },

    #[error("[Syntax] Block structure error: unexpected '{keyword}' at line {line}")]
    UnmatchedCloser { keyword: String, line: u32 },

    #[error("[Syntax] Block structure error: {depth} block(s) still open at end of input")]
    Unclosed { depth: u32 },
}

/// Something that may break once names and strings are rewritten.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Warning {
    /// A string literal spells a name that renaming could change.
    #[error("[Rename Risk] Identifier '{word}' appears inside a string literal; ensure renaming does not break logic.")]
    RenameRisk { word: String, line: u32 },

    /// A well-known API receives a computed argument.
    #[error("[API] {} called without a literal {}; obfuscation may break this call.", .api.name(), .api.argument())]
    NonLiteralArgument { api: Api, line: u32 },
}

/// APIs whose first argument must stay a readable literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Api {
    GetService,
    WaitForChild,
    InstanceNew,
}

impl Api {
    pub const ALL: [Api; 3] = [Api::GetService, Api::WaitForChild, Api::InstanceNew];

    pub fn name(self) -> &'static str {
        match self {
            Api::GetService => "GetService",
            Api::WaitForChild => "WaitForChild",
            Api::InstanceNew => "Instance.new",
        }
    }

    /// What the literal argument names.
    pub fn argument(self) -> &'static str {
        match self {
            Api::GetService | Api::WaitForChild => "string",
            Api::InstanceNew => "class name",
        }
    }
}
