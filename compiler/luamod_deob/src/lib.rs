//! Deobfuscation rewrite pipeline for Lua/Luau.
//!
//! Source goes through a fixed sequence of token-level passes:
//!
//! ```text
//! char-codes → byte-codes → escapes → inline → fold → concat → propagate → parens
//!     → [rename] → cleanup → [format]
//! ```
//!
//! Each pass re-lexes the current text, rewrites what it can prove safe and
//! copies everything else through. Output that would leave a literal
//! unterminated or change block nesting is rejected, logged, and the pass
//! is skipped. [`Pass`] lists the passes.
//!
//! ```
//! use luamod_deob::deobfuscate;
//!
//! assert_eq!(deobfuscate("local x = 5\nprint(x)", 3, false), "print(5)");
//! ```

mod edit;
mod error;
mod passes;
mod pipeline;

use luamod_fmt::{format_source, FormatConfig};

pub use error::PassError;
pub use passes::rename::is_obfuscated;
pub use passes::Pass;

/// Default nesting budget for payload inlining.
pub const DEFAULT_INLINE_DEPTH: u32 = 3;

/// Options for [`deobfuscate_with`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeobfuscateOptions {
    /// How many nested `load("...")` payloads are inlined.
    pub max_inline_depth: u32,
    /// Replace machine-generated names with `var_N` / `func_N`.
    pub rename_vars: bool,
    /// Reformat the result.
    pub reformat: Option<FormatConfig>,
}

impl Default for DeobfuscateOptions {
    fn default() -> Self {
        Self {
            max_inline_depth: DEFAULT_INLINE_DEPTH,
            rename_vars: false,
            reformat: None,
        }
    }
}

/// Deobfuscate `text` without reformatting.
pub fn deobfuscate(text: &str, max_inline_depth: u32, rename_vars: bool) -> String {
    deobfuscate_with(
        text,
        &DeobfuscateOptions {
            max_inline_depth,
            rename_vars,
            reformat: None,
        },
    )
}

#[tracing::instrument(level = "debug", skip_all, fields(bytes = text.len()))]
pub fn deobfuscate_with(text: &str, options: &DeobfuscateOptions) -> String {
    let mut out = pipeline::run(text, options.max_inline_depth);
    if options.rename_vars {
        out = pipeline::step(Pass::Rename, out, 0);
    }
    if let Some(config) = &options.reformat {
        out = format_source(&out, config);
    }
    tracing::debug!(bytes_out = out.len(), "deobfuscated");
    out
}
