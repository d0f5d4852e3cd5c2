//! Error types for Schedule Store calls.

use crate::models::EntryId;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} {path} returned status {status}")]
    Status {
        method: &'static str,
        path: String,
        status: u16,
    },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("schedule entry {0} not found")]
    NotFound(EntryId),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether the failure came from the server rejecting the request.
    pub fn is_rejection(&self) -> bool {
        matches!(self, StoreError::Status { status, .. } if (400..500).contains(status))
            || matches!(self, StoreError::NotFound(_))
    }
}
