//! Small `bytes`-based binary codec extension traits.
//!
//! Provides bounds-checked reads and infallible writes for the fixed-width
//! big-endian primitives a wire header is built from.

mod error;
mod io;

pub use error::{BinaryError, Result};
pub use io::{BinaryReader, BinaryWriter};
