use std::io;
use thiserror::Error;

/// Errors that can occur while reading or writing the fixed-width wire
/// primitives this crate deals in.
#[derive(Error, Debug)]
pub enum BinaryError {
    /// Not enough bytes remaining in the buffer for the requested read.
    #[error("not enough bytes in buffer: needed {needed}, remaining {remaining}")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// An underlying I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for binary operations.
pub type Result<T> = std::result::Result<T, BinaryError>;
