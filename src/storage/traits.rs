use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is corrupt: {0}")]
    Corrupt(String),

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous string key-value storage that survives process restarts
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` when absent
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing an absent key is not an error
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
