use std::sync::Arc;

use crate::messenger::{BroadcastChannel, BroadcastHub, SYNC_CHANNEL_CAPACITY, SYNC_CHANNEL_NAME};
use crate::session::CookieJar;
use crate::storage::{InMemorySharedStorage, SharedStorage};

/// Everything the contexts of one origin share: the durable key-value area,
/// the cookie jar and, when available, the broadcast-channel hub.
///
/// Clones refer to the same origin.
#[derive(Clone)]
pub struct BrowserOrigin {
    storage: Arc<dyn SharedStorage>,
    cookies: CookieJar,
    hub: Option<BroadcastHub>,
}

impl BrowserOrigin {
    pub fn new() -> Self {
        let capacity = *SYNC_CHANNEL_CAPACITY;
        Self::with_storage(
            Arc::new(InMemorySharedStorage::new(capacity)),
            Some(BroadcastHub::new(capacity)),
        )
    }

    /// An origin whose environment has no broadcast channel support.
    pub fn without_broadcast() -> Self {
        Self::with_storage(
            Arc::new(InMemorySharedStorage::new(*SYNC_CHANNEL_CAPACITY)),
            None,
        )
    }

    pub fn with_storage(storage: Arc<dyn SharedStorage>, hub: Option<BroadcastHub>) -> Self {
        Self {
            storage,
            cookies: CookieJar::new(),
            hub,
        }
    }

    pub fn storage(&self) -> Arc<dyn SharedStorage> {
        self.storage.clone()
    }

    pub fn cookies(&self) -> CookieJar {
        self.cookies.clone()
    }

    /// Open the sync channel, or `None` when broadcast is unsupported.
    pub async fn broadcast_channel(&self) -> Option<BroadcastChannel> {
        match &self.hub {
            Some(hub) => Some(hub.channel(SYNC_CHANNEL_NAME.as_str()).await),
            None => None,
        }
    }
}

impl Default for BrowserOrigin {
    fn default() -> Self {
        Self::new()
    }
}
