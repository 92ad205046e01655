//! Infrastructure error model.

use thiserror::Error;

use shelf_core::ValidationError;

/// Failure inside a store adapter (primary or secondary).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("store document is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    /// Backend-specific failure (e.g. a Redis command error).
    #[error("{0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Error surfaced by [`crate::service::ItemService`] operations.
///
/// Secondary-store failures deliberately have no variant here: they are
/// recorded for observability and never reach the caller.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input rejected before any mutation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("item not found")]
    NotFound,

    /// The primary store failed or timed out; the operation was aborted.
    #[error("primary store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}
