use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location span.
///
/// All line/column values are 1-based for human-readable error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "line")]
    pub start_line: u32,
    #[serde(rename = "column")]
    pub start_col: u32,
    pub end_line: u32,
    #[serde(rename = "end_column")]
    pub end_col: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Create a zero-width span at a single position.
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, line, col)
    }

    /// Extend this span so it ends where `other` ends.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start_line, self.start_col, other.end_line, other.end_col)
    }
}

impl Default for Span {
    fn default() -> Self {
        Span::point(1, 1)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// A source file: the raw bytes the compiler reads, plus a text rendering
/// for error reporting.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    /// Display text. Invalid UTF-8 is replaced with U+FFFD.
    pub source: String,
    bytes: Vec<u8>,
    /// Cached line start byte offsets (into `source`) for fast line lookup.
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Create a new source file from text.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let bytes = source.as_bytes().to_vec();
        Self::with_parts(name.into(), source, bytes)
    }

    /// Create a source file from raw bytes, which need not be UTF-8.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let source = String::from_utf8_lossy(&bytes).into_owned();
        Self::with_parts(name.into(), source, bytes)
    }

    fn with_parts(name: String, source: String, bytes: Vec<u8>) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            name,
            source,
            bytes,
            line_starts,
        }
    }

    /// The raw source bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Extract a source line by 1-based line number.
    ///
    /// Returns `None` if the line number is out of range.
    pub fn line(&self, line_number: u32) -> Option<&str> {
        let idx = line_number.checked_sub(1)? as usize;
        if idx >= self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[idx];
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| s.saturating_sub(1))
            .unwrap_or(self.source.len());
        let line = self.source.get(start..end).unwrap_or("");
        Some(line.trim_end_matches('\r'))
    }

    /// Get the total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
