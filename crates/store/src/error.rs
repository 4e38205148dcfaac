use thiserror::Error;

use common::AppError;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend I/O failure (disk full, permission denied, ...).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A slot held content that is not a valid collection.
    #[error("Corrupt slot {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Encoding a collection failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage key contains characters the backend cannot address.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// The backend refused the write (e.g. quota exceeded).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Convenience alias used throughout the crate.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Storage(err.to_string())
    }
}
