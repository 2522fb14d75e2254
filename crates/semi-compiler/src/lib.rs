//! Semi compiler: orchestrates the full compilation pipeline.
//!
//! ```text
//! Semi Source → CharStream → Data Section → Code Sections → C source → cc → executable
//! ```
//!
//! Everything up to the C source is pure and lives in [`semi_codegen`]. The
//! native build is delegated to a [`Toolchain`].

pub mod toolchain;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use semi_types::{ErrorCode, SemiError, SourceFile};

pub use toolchain::{CcToolchain, Toolchain, ToolchainConfig};

/// Executable name used when none is given.
pub const DEFAULT_OUTPUT: &str = "t";

/// The result of a compilation, suitable for JSON serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileResult {
    /// Whether compilation succeeded.
    pub success: bool,
    /// The emitted C translation unit (if successful).
    pub c_source: Option<String>,
    /// The fatal error (if any).
    pub error: Option<SemiError>,
    /// SHA-256 hex digest of the source bytes.
    pub source_hash: String,
}

/// Compile Semi source text to a C translation unit.
pub fn compile(source: &str, filename: &str) -> Result<String, SemiError> {
    compile_bytes(source.as_bytes(), filename)
}

/// Compile raw Semi source. String payloads may hold any byte value.
pub fn compile_bytes(source: &[u8], filename: &str) -> Result<String, SemiError> {
    let source_file = SourceFile::from_bytes(filename, source);
    semi_codegen::compile(&source_file)
}

/// Compile and package the outcome as a [`CompileResult`].
pub fn compile_to_result(source: &str, filename: &str) -> CompileResult {
    compile_bytes_to_result(source.as_bytes(), filename)
}

/// [`compile_to_result`] for raw source bytes.
pub fn compile_bytes_to_result(source: &[u8], filename: &str) -> CompileResult {
    let source_hash = source_hash(source);
    match compile_bytes(source, filename) {
        Ok(c_source) => CompileResult {
            success: true,
            c_source: Some(c_source),
            error: None,
            source_hash,
        },
        Err(error) => CompileResult {
            success: false,
            c_source: None,
            error: Some(error),
            source_hash,
        },
    }
}

/// Lowercase hex SHA-256 of `source`.
pub fn source_hash(source: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_ref());
    format!("{:x}", hasher.finalize())
}

/// Check an executable name: ASCII letters, `-` and `.` only.
pub fn validate_output_name(name: &str) -> Result<(), SemiError> {
    if name.is_empty() {
        return Err(SemiError::invocation(
            ErrorCode::INVALID_OUTPUT_NAME,
            "Output name cannot be empty",
        ));
    }
    match name
        .chars()
        .find(|&c| !(c.is_ascii_alphabetic() || c == '-' || c == '.'))
    {
        Some(c) => Err(SemiError::invocation(
            ErrorCode::INVALID_OUTPUT_NAME,
            format!("Invalid character in output name (got `{c}`)"),
        )),
        None => Ok(()),
    }
}
