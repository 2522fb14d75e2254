//! Semi code generator: compiles Semi source straight to C.
//!
//! # Architecture
//!
//! There is no AST. The compiler pulls characters from a
//! [`semi_lexer::CharStream`] and emits C statements as soon as each
//! source statement is recognised:
//!
//! 1. the data section (everything before the first `;`) becomes
//!    register declarations ([`data`]);
//! 2. the remaining sections alternate between straight-line and loop
//!    code ([`stmt`]);
//! 3. every String register is released at the end of `main`.
//!
//! The emitted translation unit embeds the C runtime rendered by
//! [`semi_runtime::c_runtime`], so it builds with a plain `cc` call.

pub mod command;
pub mod compiler;
pub mod data;
pub mod emitter;
pub mod stmt;

pub use command::{BinaryOp, Command, UnaryOp};
pub use compiler::{compile, compile_program, CompiledProgram};
pub use emitter::Emitter;

/// Separates program sections.
pub const SECTION_MARKER: u8 = b';';
/// Ends a string literal early in the data section.
pub const LITERAL_TERMINATOR: u8 = b'.';
/// Closes the innermost open conditional.
pub const CLOSER: u8 = b'.';
/// Starts the else-branch of the innermost open conditional.
pub const JOIN_CLOSER: u8 = b':';
