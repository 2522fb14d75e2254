//! Shared types for the Semi compiler.
//!
//! This crate defines source spans, the register alphabet and its
//! type-state table, and the structured error type used by every
//! compiler stage.

mod error;
mod register;
mod span;

pub use error::{ErrorCategory, ErrorCode, RegisterError, SemiError};
pub use register::{Register, RegisterKind, RegisterTable, REGISTER_COUNT};
pub use span::{SourceFile, Span};

/// Result type used throughout the Semi compiler.
pub type Result<T> = std::result::Result<T, SemiError>;
