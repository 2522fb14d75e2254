//! Semi runtime.
//!
//! String registers in a generated program are backed by a growable byte
//! buffer. This crate holds the reference model of that buffer
//! ([`GrowableBuffer`]), the stream-open mode table ([`FileMode`]), and
//! [`c_runtime::render`], which produces the C implementation embedded in
//! every generated program. The C text is rendered from the same constants
//! as the model so the two cannot drift apart.

pub mod buffer;
pub mod c_runtime;
pub mod mode;

pub use buffer::{GrowableBuffer, GROW_FACTOR, MIN_CAPACITY};
pub use mode::FileMode;
