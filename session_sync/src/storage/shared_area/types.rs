use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::storage::errors::StorageError;
use crate::storage::types::{ContextId, StorageChange};

/// Key-value area shared by every context of one origin.
///
/// Values are plain strings, like browser local storage. Writers identify
/// themselves so that change notifications can be attributed and filtered.
#[async_trait]
pub trait SharedStorage: Send + Sync + 'static {
    /// Get the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key` on behalf of `origin`.
    async fn set(&self, origin: ContextId, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove `key` on behalf of `origin`. Removing a missing key is not an error.
    async fn remove(&self, origin: ContextId, key: &str) -> Result<(), StorageError>;

    /// Subscribe to change notifications.
    ///
    /// A notification is published only when a value actually changes. It is
    /// delivered to every subscriber, including the writer's; receivers filter
    /// by [`StorageChange::origin`].
    fn subscribe(&self) -> broadcast::Receiver<StorageChange>;
}
