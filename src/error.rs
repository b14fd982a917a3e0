//! Error types for HeartGrid
//!
//! `GridError` and `CodecError` are the recoverable, client-facing errors:
//! their `Display` text is exactly what a session writes back to the client.
//! `HeartGridError` is the crate-wide error for everything else; grid and
//! codec errors never leave a session, so it does not wrap them.

use thiserror::Error;

/// Result type alias using HeartGridError
pub type Result<T> = std::result::Result<T, HeartGridError>;

/// Errors raised by grid reads and writes
///
/// Every variant is checked before any cell is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("address out of range.")]
    OutOfRange,

    #[error("input length too long.")]
    PayloadTooLong,

    #[error("request length too long.")]
    LengthTooLong,

    #[error("invalid character in input: {}", .0.escape_unicode())]
    InvalidCharacter(char),
}

/// Errors raised while turning an input line into a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    /// Too few arguments; carries the usage hint for the command
    #[error("{0}")]
    Usage(&'static str),

    #[error("input is not valid UTF-8.")]
    InvalidEncoding,

    /// Line exceeded `MAX_LINE` bytes; the rest of it was discarded
    #[error("input line too long.")]
    LineTooLong,
}

/// Unified error type for HeartGrid operations
#[derive(Debug, Error)]
pub enum HeartGridError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Persistence Errors
    // -------------------------------------------------------------------------
    #[error("Persistence error: {0}")]
    Persistence(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Signal error: {0}")]
    Signal(String),
}

impl From<serde_json::Error> for HeartGridError {
    fn from(e: serde_json::Error) -> Self {
        HeartGridError::Persistence(e.to_string())
    }
}
