use crate::{RegisterKind, Span};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error category, determined by error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Invocation,
    Syntax,
    Semantic,
    Structure,
    Unimplemented,
}

/// Numeric error code. Doubles as the driver's process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u8);

impl ErrorCode {
    // ── Invocation ──
    pub const MISSING_SOURCE: Self = Self(1);
    pub const INVALID_OUTPUT_NAME: Self = Self(10);
    pub const IO: Self = Self(15);

    // ── Lexical / syntax ──
    pub const EXPECTED_REGISTER: Self = Self(2);
    pub const EXPECTED_MODE: Self = Self(3);
    pub const EXPECTED_DIGIT: Self = Self(4);
    pub const LITERAL_TOO_LONG: Self = Self(5);
    pub const PUSHBACK_OVERFLOW: Self = Self(6);
    pub const NEGATIVE_LENGTH: Self = Self(13);

    // ── Semantic ──
    pub const UNKNOWN_COMMAND: Self = Self(7);
    pub const UNDECLARED_REGISTER: Self = Self(8);
    pub const TYPE_MISMATCH: Self = Self(9);
    pub const REGISTER_REDECLARED: Self = Self(12);
    pub const CONSTANT_TARGET: Self = Self(16);

    // ── Structure ──
    pub const UNEXPECTED_CLOSER: Self = Self(11);
    pub const UNCLOSED_CONDITIONAL: Self = Self(14);

    // ── Not yet implemented ──
    pub const NOT_IMPLEMENTED: Self = Self(42);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            1 | 10 | 15 => ErrorCategory::Invocation,
            2..=6 | 13 => ErrorCategory::Syntax,
            7..=9 | 12 | 16 => ErrorCategory::Semantic,
            11 | 14 => ErrorCategory::Structure,
            _ => ErrorCategory::Unimplemented,
        }
    }

    /// Process exit status for this code.
    pub fn exit_status(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invocation => write!(f, "invocation"),
            Self::Syntax => write!(f, "syntax"),
            Self::Semantic => write!(f, "semantic"),
            Self::Structure => write!(f, "structure"),
            Self::Unimplemented => write!(f, "unimplemented"),
        }
    }
}

/// Failures of register lookups against the type-state table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error("Expected register name (got `{0}`)")]
    InvalidName(char),

    #[error("Undeclared register `{0}`")]
    Undeclared(char),

    #[error("Expected {expected} register `{register}`, got {actual}")]
    TypeMismatch {
        register: char,
        expected: RegisterKind,
        actual: RegisterKind,
    },

    #[error("Register `{register}` is already declared as {existing}")]
    Redeclared {
        register: char,
        existing: RegisterKind,
    },
}

impl RegisterError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidName(_) => ErrorCode::EXPECTED_REGISTER,
            Self::Undeclared(_) => ErrorCode::UNDECLARED_REGISTER,
            Self::TypeMismatch { .. } => ErrorCode::TYPE_MISMATCH,
            Self::Redeclared { .. } => ErrorCode::REGISTER_REDECLARED,
        }
    }
}

/// A structured, fatal Semi compiler error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemiError {
    /// Source file name.
    pub file: String,
    /// Error code (e.g., E9).
    pub code: ErrorCode,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// Source location.
    #[serde(flatten)]
    pub span: Span,
    /// The exact source line for context.
    pub source_line: String,
    /// Optional fix suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl SemiError {
    /// Create a new error.
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            category: code.category(),
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// An error with no source position, e.g. from argument handling.
    pub fn invocation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new("", code, message, Span::default(), "")
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for SemiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.file.is_empty() {
            write!(f, "{}:{}: ", self.file, self.span)?;
        }
        write!(f, "{} [{}] {}", self.code, self.category, self.message)
    }
}

impl std::error::Error for SemiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::MISSING_SOURCE.category(), ErrorCategory::Invocation);
        assert_eq!(ErrorCode::EXPECTED_REGISTER.category(), ErrorCategory::Syntax);
        assert_eq!(ErrorCode::PUSHBACK_OVERFLOW.category(), ErrorCategory::Syntax);
        assert_eq!(ErrorCode::TYPE_MISMATCH.category(), ErrorCategory::Semantic);
        assert_eq!(ErrorCode::CONSTANT_TARGET.category(), ErrorCategory::Semantic);
        assert_eq!(ErrorCode::UNEXPECTED_CLOSER.category(), ErrorCategory::Structure);
        assert_eq!(ErrorCode::UNCLOSED_CONDITIONAL.category(), ErrorCategory::Structure);
        assert_eq!(ErrorCode::NOT_IMPLEMENTED.category(), ErrorCategory::Unimplemented);
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let codes = [
            ErrorCode::MISSING_SOURCE,
            ErrorCode::EXPECTED_REGISTER,
            ErrorCode::EXPECTED_MODE,
            ErrorCode::EXPECTED_DIGIT,
            ErrorCode::LITERAL_TOO_LONG,
            ErrorCode::PUSHBACK_OVERFLOW,
            ErrorCode::UNKNOWN_COMMAND,
            ErrorCode::UNDECLARED_REGISTER,
            ErrorCode::TYPE_MISMATCH,
            ErrorCode::INVALID_OUTPUT_NAME,
            ErrorCode::UNEXPECTED_CLOSER,
            ErrorCode::REGISTER_REDECLARED,
            ErrorCode::NEGATIVE_LENGTH,
            ErrorCode::UNCLOSED_CONDITIONAL,
            ErrorCode::IO,
            ErrorCode::CONSTANT_TARGET,
            ErrorCode::NOT_IMPLEMENTED,
        ];
        let mut seen = std::collections::HashSet::new();
        for code in codes {
            assert!(code.exit_status() != 0);
            assert!(seen.insert(code), "duplicate code {code}");
        }
    }

    #[test]
    fn test_register_error_messages() {
        let err = RegisterError::TypeMismatch {
            register: 'b',
            expected: RegisterKind::Number,
            actual: RegisterKind::String,
        };
        assert_eq!(err.to_string(), "Expected numeric register `b`, got string");
        assert_eq!(err.code(), ErrorCode::TYPE_MISMATCH);
        assert_eq!(
            RegisterError::Undeclared('q').to_string(),
            "Undeclared register `q`"
        );
    }

    #[test]
    fn test_display_format() {
        let err = SemiError::new(
            "prog.s4",
            ErrorCode::UNEXPECTED_CLOSER,
            "Unexpected closer `.`",
            Span::point(3, 2),
            ";.",
        );
        assert_eq!(
            err.to_string(),
            "prog.s4:3:2: E11 [structure] Unexpected closer `.`"
        );
        let bare = SemiError::invocation(ErrorCode::MISSING_SOURCE, "Expected file name");
        assert_eq!(bare.to_string(), "E1 [invocation] Expected file name");
    }

    #[test]
    fn test_json_serialization() {
        let err = SemiError::new(
            "prog.s4",
            ErrorCode::TYPE_MISMATCH,
            "Expected string register `a`, got numeric",
            Span::point(2, 1),
            "a@12",
        )
        .with_suggestion("Declare `a` with mode `s`");

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"code\":9"));
        assert!(json.contains("\"category\":\"semantic\""));
        assert!(json.contains("\"line\":2"));
        assert!(json.contains("\"suggestion\""));

        let back: SemiError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
