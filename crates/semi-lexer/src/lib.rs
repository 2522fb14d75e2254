//! Semi lexer: a character-at-a-time reader over source text.
//!
//! Semi has no multi-character tokens, so the lexer is a character stream
//! rather than a tokenizer. Parsers pull one significant character at a
//! time and may return up to [`PUSHBACK_CAPACITY`] characters for
//! re-reading.

pub mod stream;

pub use stream::{CharStream, LexError, SourceChar, COMMENT_MARKER, PUSHBACK_CAPACITY};
