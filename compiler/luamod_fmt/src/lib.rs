//! Lua/Luau formatter.
//!
//! Formatting works on the lossless token stream from `luamod_lexer`; there
//! is no syntax tree. Indentation comes from a keyword-driven depth counter
//! and spacing from a declarative rule table.
//!
//! # Modules
//!
//! - [`depth`]: block depth tracking and safe-mode detection
//! - [`spacing`]: token-pair spacing rules
//! - [`emitter`]: output abstraction
//! - [`formatter`]: the layout engine
//!
//! # Example
//!
//! ```
//! use luamod_fmt::{format_source, FormatConfig};
//!
//! let out = format_source("if x then\nprint(x)\nend", &FormatConfig::spaces(4));
//! assert_eq!(out, "if x then\n    print(x)\nend\n");
//! ```

pub mod depth;
pub mod emitter;
pub mod formatter;
pub mod spacing;

pub use depth::{annotate, DepthAnnotated, DepthTracker, Mode};
pub use emitter::{Emitter, StringEmitter};
pub use formatter::{format, format_source, format_with, FormatConfig, Formatter};
