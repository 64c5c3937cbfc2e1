use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{Mutex, broadcast};

use crate::storage::errors::StorageError;
use crate::storage::types::{ContextId, StorageChange};

use super::types::SharedStorage;

/// In-process shared area used when all contexts live in one process.
pub struct InMemorySharedStorage {
    entries: Mutex<HashMap<String, String>>,
    changes: broadcast::Sender<StorageChange>,
}

impl InMemorySharedStorage {
    /// Create an empty area whose change channel buffers `capacity` events
    /// per subscriber before it starts lagging.
    pub fn new(capacity: usize) -> Self {
        tracing::info!("Creating new in-memory shared storage area");
        let (changes, _) = broadcast::channel(capacity.max(1));
        Self {
            entries: Mutex::new(HashMap::new()),
            changes,
        }
    }

    fn notify(
        &self,
        origin: ContextId,
        key: &str,
        old_value: Option<String>,
        new_value: Option<String>,
    ) {
        if old_value == new_value {
            return;
        }
        let change = StorageChange {
            key: key.to_string(),
            old_value,
            new_value,
            origin,
        };
        if self.changes.send(change).is_err() {
            tracing::trace!("No storage listeners for key {}", key);
        }
    }
}

#[async_trait]
impl SharedStorage for InMemorySharedStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, origin: ContextId, key: &str, value: String) -> Result<(), StorageError> {
        let old_value = {
            let mut entries = self.entries.lock().await;
            entries.insert(key.to_string(), value.clone())
        };
        self.notify(origin, key, old_value, Some(value));
        Ok(())
    }

    async fn remove(&self, origin: ContextId, key: &str) -> Result<(), StorageError> {
        let old_value = self.entries.lock().await.remove(key);
        self.notify(origin, key, old_value, None);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}
