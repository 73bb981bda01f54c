//! Pass sequencing and output checks.

use luamod_fmt::annotate;
use luamod_lexer::{concat, tokenize, Token};

use crate::error::PassError;
use crate::passes::Pass;

/// Core passes then cleanup. Payloads found by the inline pass come back
/// through here with `budget - 1`.
#[tracing::instrument(level = "debug", skip_all, fields(bytes = text.len(), budget = budget))]
pub(crate) fn run(text: &str, budget: u32) -> String {
    let mut current = text.to_owned();
    for pass in Pass::CORE {
        current = step(pass, current, budget);
    }
    step(Pass::Cleanup, current, budget)
}

/// Run one pass over `text`, keeping `text` when the output is rejected.
pub(crate) fn step(pass: Pass, text: String, budget: u32) -> String {
    match attempt(pass, &text, budget) {
        Ok(Some(next)) => next,
        Ok(None) => text,
        Err(err) => {
            tracing::warn!(pass = err.pass().name(), %err, "pass output rejected");
            text
        }
    }
}

fn attempt(pass: Pass, text: &str, budget: u32) -> Result<Option<String>, PassError> {
    let tokens = tokenize(text);
    let (rewritten, edits) = pass.apply(&tokens, budget);
    if edits == 0 {
        tracing::debug!(pass = pass.name(), "no change");
        return Ok(None);
    }
    let output = concat(&rewritten);
    tracing::debug!(
        pass = pass.name(),
        edits,
        bytes_in = text.len(),
        bytes_out = output.len(),
        "pass applied"
    );
    verify(pass, &tokens, &output)?;
    Ok(Some(output))
}

fn verify(pass: Pass, before: &[Token<'_>], output: &str) -> Result<(), PassError> {
    let after = tokenize(output);
    let (open_before, open_after) = (unterminated(before), unterminated(&after));
    if open_after > open_before {
        return Err(PassError::Unterminated {
            pass,
            before: open_before,
            after: open_after,
        });
    }
    let (shape_before, shape_after) = (nesting(before), nesting(&after));
    if shape_before != shape_after {
        return Err(PassError::Unbalanced {
            pass,
            before: shape_before,
            after: shape_after,
        });
    }
    Ok(())
}

fn unterminated(tokens: &[Token<'_>]) -> usize {
    tokens.iter().filter(|t| t.is_unterminated()).count()
}

/// Depth left open and number of unmatched closers.
fn nesting(tokens: &[Token<'_>]) -> (u32, usize) {
    let annotated = annotate(tokens);
    (annotated.open_depth, annotated.unmatched.len())
}

#[cfg(test)]
mod tests;
