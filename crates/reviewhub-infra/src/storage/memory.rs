//! Process-local session storage; nothing survives a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use reviewhub_core::ports::{SessionStorage, StorageError};

#[derive(Default)]
pub struct InMemorySessionStorage {
    records: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStorage {
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.records
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
