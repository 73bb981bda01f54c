//! Rejected pass output.

use thiserror::Error;

use crate::passes::Pass;

/// Why the pipeline refused a pass's output and kept its input instead.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PassError {
    /// The rewrite left more strings or long comments open than before.
    #[error("{pass} left {after} unterminated literal(s), input had {before}")]
    Unterminated { pass: Pass, before: usize, after: usize },

    /// The rewrite changed how blocks nest.
    #[error("{pass} changed block nesting: {before:?} open/unmatched became {after:?}")]
    Unbalanced {
        pass: Pass,
        before: (u32, usize),
        after: (u32, usize),
    },
}

impl PassError {
    pub fn pass(&self) -> Pass {
        match self {
            PassError::Unterminated { pass, .. } | PassError::Unbalanced { pass, .. } => *pass,
        }
    }
}
