use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

use super::types::{CacheInvalidator, InMemoryResponseCache};

const CACHE_PREFIX: &str = "cache";

impl InMemoryResponseCache {
    pub fn new() -> Self {
        tracing::debug!("Creating new in-memory response cache");
        Self {
            entry: Mutex::new(HashMap::new()),
        }
    }

    fn make_key(prefix: &str, key: &str) -> String {
        format!("{CACHE_PREFIX}:{prefix}:{key}")
    }

    pub async fn put(&self, prefix: &str, key: &str, value: CacheData) {
        let key = Self::make_key(prefix, key);
        self.entry.lock().await.insert(key, value);
    }

    pub async fn get(&self, prefix: &str, key: &str) -> Option<CacheData> {
        let key = Self::make_key(prefix, key);
        self.entry.lock().await.get(&key).cloned()
    }

    pub async fn remove(&self, prefix: &str, key: &str) {
        let key = Self::make_key(prefix, key);
        self.entry.lock().await.remove(&key);
    }

    /// Cache a response body as JSON.
    pub async fn put_json<T: Serialize>(
        &self,
        prefix: &str,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let value = serde_json::to_string(value)?;
        self.put(prefix, key, CacheData { value }).await;
        Ok(())
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        prefix: &str,
        key: &str,
    ) -> Result<Option<T>, StorageError> {
        match self.get(prefix, key).await {
            Some(data) => Ok(Some(serde_json::from_str(&data.value)?)),
            None => Ok(None),
        }
    }

    pub async fn len(&self) -> usize {
        self.entry.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entry.lock().await.is_empty()
    }
}

impl Default for InMemoryResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheInvalidator for InMemoryResponseCache {
    async fn invalidate_all(&self) {
        let mut entry = self.entry.lock().await;
        tracing::debug!("Dropping {} cached responses", entry.len());
        entry.clear();
    }
}
