use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Data stored in a context's response cache
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheData {
    pub value: String,
}

/// Identity of one execution context (a browser tab).
///
/// Every write to the shared area and every broadcast message is tagged with
/// the writer's id so that contexts can ignore their own notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(Uuid);

impl ContextId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form keeps log lines readable
        let id = self.0.simple().to_string();
        write!(f, "{}", &id[..8])
    }
}

/// Change notification emitted by the shared area after a write or removal.
///
/// Mirrors the browser `storage` event: it carries the key together with the
/// value before and after the change. `None` means the key was absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub key: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub origin: ContextId,
}
