//! Durable key/value storage for the session record.

use async_trait::async_trait;

/// Survives process restarts; one record per key.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// `None` when nothing was stored under `key`.
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
