//! Unified error type for archive construction.
//!
//! Every failure is raised before the archive buffer is touched, so an
//! `Err` from any builder operation leaves the archive exactly as it was.
use thiserror::Error;

/// Main error type for archive operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Entry input is malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Path does not fit the 100-byte name field
    #[error("Path too long: {len} bytes (maximum {max})")]
    PathTooLong { len: usize, max: usize },

    /// A header field value is wider than the field
    #[error("Field '{field}' overflow: {reason}")]
    FieldOverflow { field: &'static str, reason: String },

    /// Text content holds a character outside the single-byte range
    #[error("Character U+{code_point:04X} at index {index} is outside the single-byte range")]
    EncodingRange { code_point: u32, index: usize },

    /// Archive would grow past the configured size limit
    #[error("Archive size limit exceeded: {required} bytes required, limit is {limit}")]
    ResourceLimit { required: u64, limit: u64 },

    /// Archive was already finalized
    #[error("Archive is finalized; clear it before appending")]
    Finalized,

    /// Configuration is invalid or failed to parse
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for archive operations.
pub type Result<T> = std::result::Result<T, Error>;
