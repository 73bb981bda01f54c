//! Validation run before obfuscating Lua/Luau source.
//!
//! [`validate`] lexes the source, tracks block depth and reports:
//!
//! - at most one [`SyntaxError`]: the first unterminated literal or long
//!   comment, unmatched closer, or the blocks left open at the end;
//! - a [`Warning::RenameRisk`] for every name-like word inside a quoted
//!   string, since renaming cannot follow names built from strings;
//! - a [`Warning::NonLiteralArgument`] when `GetService`, `WaitForChild`
//!   or `Instance.new` is called with a computed argument.
//!
//! Which of these to show, and how, is up to the caller.
//!
//! ```
//! let report = luamod_lint::validate("local s = game:GetService(name)");
//! assert!(report.errors.is_empty());
//! assert_eq!(report.warnings.len(), 1);
//! ```

mod checks;
mod issue;

use luamod_fmt::{annotate, Mode};
use luamod_lexer::{tokenize, NameTables};

pub use issue::{Api, SyntaxError, Warning};

/// Outcome of [`validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validation {
    pub warnings: Vec<Warning>,
    pub errors: Vec<SyntaxError>,
    /// [`Mode::Safe`] when the source holds characters the lexer does not
    /// recognize.
    pub mode: Mode,
}

impl Validation {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }

    /// Rendered warnings and errors.
    pub fn messages(&self) -> (Vec<String>, Vec<String>) {
        (
            self.warnings.iter().map(ToString::to_string).collect(),
            self.errors.iter().map(ToString::to_string).collect(),
        )
    }
}

#[tracing::instrument(level = "debug", skip_all, fields(bytes = code.len()))]
pub fn validate(code: &str) -> Validation {
    let tokens = tokenize(code);
    let annotated = annotate(&tokens);
    let errors: Vec<SyntaxError> = checks::syntax(&tokens, &annotated).into_iter().collect();
    let mut warnings = checks::rename_risks(&tokens, NameTables::lua());
    warnings.extend(checks::api_calls(&tokens));
    tracing::debug!(warnings = warnings.len(), errors = errors.len(), "validated");
    Validation {
        warnings,
        errors,
        mode: annotated.mode,
    }
}
