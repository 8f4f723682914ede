//! Error types for daylog-core.

use thiserror::Error;

/// Result type alias for daylog-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in daylog-core operations.
///
/// Parsing, toggling and single-line migration never fail; only date
/// handling, line addressing and the store can.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Date key is not a well-formed `YYYY-MM-DD` calendar date.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Line index past the end of the document.
    #[error("line {index} out of range (document has {len} lines)")]
    LineOutOfRange { index: usize, len: usize },

    /// Failure reported by the store backend.
    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CoreError {
    /// Wrap a backend error as a store failure.
    pub fn store(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Store(err.into())
    }
}
