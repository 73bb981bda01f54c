//! Block depth tracking ("block engine").
//!
//! A keyword-driven counter assigns every token a nesting depth without
//! parsing. Openers (`function`, `do`, `then`, `repeat`) raise the depth
//! after the token; closers (`end`, `until`) lower it before the token;
//! `else`/`elseif` sit one level out from the block they divide.
//!
//! The tracker never fails. A closer with nothing open is clamped at zero
//! and recorded; an [`Unknown`](TokenKind::Unknown) token switches the
//! stream to [`Mode::Safe`] for collaborators that want to back off
//! aggressive rewrites. The tracker itself behaves the same in both modes.

use luamod_lexer::{Token, TokenKind};

/// Whether the stream looked like ordinary Lua so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// An unrecognized character was seen. Sticky.
    Safe,
}

/// Per-token depths plus the structural observations made on the way.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DepthAnnotated {
    /// Depth of each input token, index-aligned with the token slice.
    pub depths: Vec<u32>,
    pub mode: Mode,
    /// Indices of closers (`end`, `until`, `else`, `elseif`) that found
    /// nothing open and were clamped at depth 0.
    pub unmatched: Vec<usize>,
    /// Depth still open after the last token.
    pub open_depth: u32,
}

impl DepthAnnotated {
    /// No clamped closer and nothing left open.
    pub fn is_balanced(&self) -> bool {
        self.unmatched.is_empty() && self.open_depth == 0
    }
}

/// Streaming depth counter.
#[derive(Clone, Debug, Default)]
pub struct DepthTracker {
    depth: u32,
    mode: Mode,
    /// Between `elseif` and the `then` that ends its condition.
    in_elseif_condition: bool,
}

/// What [`DepthTracker::step`] observed for one token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub depth: u32,
    /// The token closed a block while nothing was open.
    pub clamped: bool,
}

impl DepthTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one token and return the depth it is recorded at.
    pub fn step(&mut self, token: &Token<'_>) -> Step {
        match token.kind {
            TokenKind::Unknown => {
                self.mode = Mode::Safe;
                return self.record(false);
            }
            TokenKind::Keyword => {}
            _ => return self.record(false),
        }
        match token.text.as_ref() {
            "function" | "do" | "repeat" => self.open_after(),
            "then" => {
                if self.in_elseif_condition {
                    self.in_elseif_condition = false;
                    self.record(false)
                } else {
                    self.open_after()
                }
            }
            "end" | "until" => self.close_before(),
            "else" => self.divide(),
            "elseif" => {
                self.in_elseif_condition = true;
                self.divide()
            }
            _ => self.record(false),
        }
    }

    /// Consume the tracker and annotate a whole stream.
    pub fn annotate(mut self, tokens: &[Token<'_>]) -> DepthAnnotated {
        let mut depths = Vec::with_capacity(tokens.len());
        let mut unmatched = Vec::new();
        for (i, token) in tokens.iter().enumerate() {
            let step = self.step(token);
            if step.clamped {
                unmatched.push(i);
            }
            depths.push(step.depth);
        }
        DepthAnnotated {
            depths,
            mode: self.mode,
            unmatched,
            open_depth: self.depth,
        }
    }

    fn record(&self, clamped: bool) -> Step {
        Step {
            depth: self.depth,
            clamped,
        }
    }

    fn open_after(&mut self) -> Step {
        let step = self.record(false);
        self.depth = self.depth.saturating_add(1);
        step
    }

    fn close_before(&mut self) -> Step {
        let clamped = self.depth == 0;
        self.depth = self.depth.saturating_sub(1);
        self.record(clamped)
    }

    fn divide(&mut self) -> Step {
        let step = self.close_before();
        self.depth = self.depth.saturating_add(1);
        step
    }
}

/// Annotate `tokens` with a fresh tracker.
pub fn annotate(tokens: &[Token<'_>]) -> DepthAnnotated {
    DepthTracker::new().annotate(tokens)
}

#[cfg(test)]
mod tests;
