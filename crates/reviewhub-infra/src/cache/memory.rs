//! In-memory query cache. Lives as long as the process.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use reviewhub_core::ports::{Cache, CacheError};

struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

/// In-memory cache using a simple HashMap with async RwLock.
pub struct InMemoryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    fn is_expired(entry: &CacheEntry) -> bool {
        entry
            .expires_at
            .map(|exp| Instant::now() > exp)
            .unwrap_or(false)
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let store = self.store.read().await;
        store.values().filter(|e| !Self::is_expired(e)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let store = self.store.read().await;
        let entry = store.get(key)?;

        if Self::is_expired(entry) {
            drop(store);
            let mut store = self.store.write().await;
            // a set may have landed between the two locks
            let fresh = store
                .get(key)
                .filter(|e| !Self::is_expired(e))
                .map(|e| e.value.clone());
            if fresh.is_none() {
                store.remove(key);
            }
            return fresh;
        }

        Some(entry.value.clone())
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut store = self.store.write().await;

        let expires_at = ttl.map(|d| Instant::now() + d);

        store.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut store = self.store.write().await;
        store.remove(key);
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        let mut store = self.store.write().await;
        let before = store.len();
        store.retain(|key, _| !key.starts_with(prefix));
        Ok(before - store.len())
    }
}
