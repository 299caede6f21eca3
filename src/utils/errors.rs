use thiserror::Error;

use crate::storage::StorageError;

/// Main error type for Athyra
#[derive(Error, Debug)]
pub enum AthyraError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
