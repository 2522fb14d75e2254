//! Indented C source writer.

use std::fmt::Write;

const INDENT: &str = "    ";

/// Accumulates generated C, tracking block depth for indentation.
#[derive(Debug, Default)]
pub struct Emitter {
    out: String,
    depth: usize,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append verbatim text with no indentation applied.
    pub fn raw(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Write one indented line.
    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        let _ = writeln!(self.out, "{}", text.as_ref());
    }

    /// Write a block header such as `while(x) {` and indent what follows.
    pub fn open(&mut self, header: impl AsRef<str>) {
        self.line(header);
        self.depth += 1;
    }

    /// Close the innermost block.
    pub fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    /// Close the innermost block and open a sibling, e.g. `} else {`.
    pub fn reopen(&mut self, header: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.open(header);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn finish(self) -> String {
        self.out
    }
}
