//! Character stream with whitespace/comment skipping and LIFO push-back.

use semi_types::{ErrorCode, SourceFile, Span};
use thiserror::Error;

/// Maximum number of characters that can be pushed back at once.
pub const PUSHBACK_CAPACITY: usize = 8;

/// Starts a comment that runs to end of line.
pub const COMMENT_MARKER: u8 = b'\'';

/// A source byte together with where it was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceChar {
    pub byte: u8,
    pub span: Span,
}

impl SourceChar {
    pub fn new(byte: u8, span: Span) -> Self {
        Self { byte, span }
    }

    /// Printable form for diagnostics.
    pub fn display(&self) -> char {
        self.byte as char
    }
}

/// Lexical failures of the stream itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Un-Buffer overflow (max capacity {cap})", cap = PUSHBACK_CAPACITY)]
    PushbackOverflow { span: Span },
}

impl LexError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::PushbackOverflow { .. } => ErrorCode::PUSHBACK_OVERFLOW,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::PushbackOverflow { span } => *span,
        }
    }
}

/// Reads a source file one byte at a time.
///
/// Pushed-back characters are always replayed, most recent first, before
/// any new input is consumed.
pub struct CharStream<'src> {
    source: &'src [u8],
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
    pushback: [SourceChar; PUSHBACK_CAPACITY],
    pushed: usize,
}

impl<'src> CharStream<'src> {
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self::from_bytes(source_file.bytes())
    }

    pub fn from_bytes(source: &'src [u8]) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            col: 1,
            pushback: [SourceChar::new(0, Span::default()); PUSHBACK_CAPACITY],
            pushed: 0,
        }
    }

    /// Next meaningful character, skipping whitespace and comments.
    ///
    /// Returns `None` at end of input.
    pub fn next_significant(&mut self) -> Option<SourceChar> {
        let mut in_comment = false;
        loop {
            let c = self.next_raw()?;
            if in_comment {
                in_comment = c.byte != b'\n';
                continue;
            }
            if c.byte == COMMENT_MARKER {
                in_comment = true;
                continue;
            }
            if is_space(c.byte) || c.byte == 0 {
                continue;
            }
            return Some(c);
        }
    }

    /// Next character without any skipping. Used for literal payloads.
    pub fn next_raw(&mut self) -> Option<SourceChar> {
        if self.pushed > 0 {
            self.pushed -= 1;
            return Some(self.pushback[self.pushed]);
        }
        let byte = *self.source.get(self.pos)?;
        let span = self.position();
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(SourceChar::new(byte, span))
    }

    /// Return a character to the stream for later re-reading.
    pub fn push_back(&mut self, c: SourceChar) -> Result<(), LexError> {
        if self.pushed == PUSHBACK_CAPACITY {
            return Err(LexError::PushbackOverflow { span: c.span });
        }
        self.pushback[self.pushed] = c;
        self.pushed += 1;
        Ok(())
    }

    /// Number of characters waiting to be replayed.
    pub fn pending(&self) -> usize {
        self.pushed
    }

    /// Position of the next unread source byte.
    pub fn position(&self) -> Span {
        Span::point(self.line, self.col)
    }
}

/// C `isspace`: ASCII whitespace including vertical tab.
fn is_space(c: u8) -> bool {
    c.is_ascii_whitespace() || c == 0x0b
}
