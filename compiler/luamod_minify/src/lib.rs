//! Scope analysis and minification for Lua/Luau.
//!
//! The scope analyzer approximates which names are locals from the token
//! stream alone; the minifier renames those locals to the shortest free
//! names, optionally canonicalizes literals, and serializes with the fewest
//! separators that keep the token stream intact.
//!
//! ```
//! use luamod_minify::minify_source;
//!
//! assert_eq!(minify_source("local HelloWorld = 1\nprint(HelloWorld)"), "local a=1 print(a)");
//! ```

pub mod canonical;
mod minifier;
pub mod rename;
pub mod scope;
mod serialize;

pub use minifier::{minify, minify_source, minify_with, MinifyOptions, MinifyStats};
pub use rename::{NameGenerator, RenameMap};
pub use scope::{analyze, analyze_with, ScopeStack};
pub use serialize::{normalize, serialize};
