//! Storage error types.

use thiserror::Error;

/// Failures from a measurement store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not reach or open the backing database.
    #[error("database connection failed: {0}")]
    Connection(String),

    /// A read query failed.
    #[error("query failed: {0}")]
    Query(String),

    /// A write failed. Callers treat this as a soft failure: the value
    /// being written is still a valid answer for the current request.
    #[error("write failed: {0}")]
    Write(String),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
