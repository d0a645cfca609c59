use std::path::PathBuf;

use thiserror::Error;

use crate::memory::Slot;

/// Errors raised by the calculator and the session interpreter
#[derive(Error, Debug)]
pub enum CalculatorError {
    /// A save was requested before any arithmetic operation produced a result
    #[error("Can't store to memory: no result found")]
    NoResult,

    /// The memory store failed for a reason other than an empty slot
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    /// A session line could not be understood
    #[error("Invalid command on line {line}: {message}")]
    InvalidCommand { line: usize, message: String },

    /// Reading a session script failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Option combinations rejected before running
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised by memory store implementations.
///
/// An empty slot is not an error: stores report it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum MemoryError {
    /// Reading or writing the backing file failed
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing document is not valid JSON for the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backing document was written by an unknown format version
    #[error("Unsupported memory file version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// Any other failure reported by a store implementation
    #[error("Memory backend failed on slot {slot}: {message}")]
    Backend { slot: Slot, message: String },
}

/// Convenience Result type alias for the calculator
pub type Result<T> = std::result::Result<T, CalculatorError>;

/// Result alias for memory store operations
pub type MemoryResult<T> = std::result::Result<T, MemoryError>;

impl CalculatorError {
    /// Create an invalid command error for a 1-based session line
    pub fn invalid_command<S: Into<String>>(line: usize, message: S) -> Self {
        CalculatorError::InvalidCommand {
            line,
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation_error<S: Into<String>>(msg: S) -> Self {
        CalculatorError::Validation(msg.into())
    }
}

impl MemoryError {
    /// Wrap an IO error together with the path it happened on
    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        MemoryError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a generic backend error
    pub fn backend<S: Into<String>>(slot: Slot, message: S) -> Self {
        MemoryError::Backend {
            slot,
            message: message.into(),
        }
    }
}
