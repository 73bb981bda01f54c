//! Output emitter.
//!
//! The formatter writes through [`Emitter`] so the layout logic never
//! touches the output buffer directly.

/// Sink for formatted output.
pub trait Emitter {
    /// Emit a text fragment verbatim.
    fn emit(&mut self, text: &str);

    /// Emit a newline (Unix-style `\n`).
    fn emit_newline(&mut self);

    /// Emit `unit` repeated `level` times.
    fn emit_indent(&mut self, unit: &str, level: u32);

    /// Emit a single space.
    fn emit_space(&mut self);
}

/// In-memory emitter.
#[derive(Default)]
pub struct StringEmitter {
    buffer: String,
}

impl StringEmitter {
    /// Create with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
        }
    }

    /// Get the formatted output.
    pub fn output(self) -> String {
        self.buffer
    }

    /// Strip trailing whitespace and blank lines, then end with exactly
    /// one newline.
    pub fn finish_with_newline(&mut self) {
        let trimmed = self.buffer.trim_end().len();
        self.buffer.truncate(trimmed);
        self.buffer.push('\n');
    }
}

impl Emitter for StringEmitter {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn emit_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn emit_indent(&mut self, unit: &str, level: u32) {
        for _ in 0..level {
            self.buffer.push_str(unit);
        }
    }

    fn emit_space(&mut self) {
        self.buffer.push(' ');
    }
}

#[cfg(test)]
mod tests;
