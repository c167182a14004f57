//! Error types for upstream griddap access.

use thiserror::Error;

/// Failures raised while resolving a point against the upstream service.
#[derive(Debug, Error)]
pub enum ErddapError {
    /// Dataset id outside the supported registry.
    #[error("unsupported dataset: {0}")]
    UnsupportedDataset(String),

    /// Upstream answered with a non-success status.
    #[error("upstream returned HTTP {status} for {query}")]
    UpstreamStatus { status: u16, query: String },

    /// Connect, timeout, or body-read failure before any status arrived.
    #[error("upstream request failed: {message}")]
    Transport { message: String, query: String },

    /// Body arrived but was not the expected tabular JSON.
    #[error("invalid upstream response body: {0}")]
    InvalidBody(String),
}

impl ErddapError {
    /// HTTP status the API edge maps this error to.
    pub fn status_code(&self) -> u16 {
        match self {
            ErddapError::UnsupportedDataset(_) => 404,
            ErddapError::UpstreamStatus { .. }
            | ErddapError::Transport { .. }
            | ErddapError::InvalidBody(_) => 500,
        }
    }

    /// The rendered griddap query attached to the failure, if any.
    pub fn query(&self) -> Option<&str> {
        match self {
            ErddapError::UpstreamStatus { query, .. } | ErddapError::Transport { query, .. } => {
                Some(query)
            }
            _ => None,
        }
    }

    /// Status the upstream answered with, when it answered at all.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ErddapError::UpstreamStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
