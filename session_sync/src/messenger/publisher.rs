use std::sync::Arc;

use crate::storage::{ContextId, SharedStorage};

use super::errors::MessengerError;
use super::hub::BroadcastChannel;
use super::subscription::Subscription;
use super::types::SyncMessage;

/// A context's endpoint on both sync transports.
#[derive(Clone)]
pub struct Messenger {
    origin: ContextId,
    channel: Option<BroadcastChannel>,
    storage: Arc<dyn SharedStorage>,
    envelope_key: String,
}

impl Messenger {
    /// Without a broadcast channel the messenger degrades to storage-change
    /// notifications only.
    pub fn new(
        origin: ContextId,
        channel: Option<BroadcastChannel>,
        storage: Arc<dyn SharedStorage>,
        envelope_key: impl Into<String>,
    ) -> Self {
        if channel.is_none() {
            tracing::warn!(
                "Broadcast transport unavailable for context {}; relying on storage changes",
                origin
            );
        }
        Self {
            origin,
            channel,
            storage,
            envelope_key: envelope_key.into(),
        }
    }

    pub fn origin(&self) -> ContextId {
        self.origin
    }

    pub fn has_broadcast(&self) -> bool {
        self.channel.is_some()
    }

    /// Post `message` to sibling contexts over the broadcast transport.
    pub fn publish(&self, message: SyncMessage) -> Result<(), MessengerError> {
        let channel = self.channel.as_ref().ok_or_else(|| {
            MessengerError::TransportUnavailable("no broadcast channel".to_string())
        })?;
        let receivers = channel.post(self.origin, message.as_str());
        tracing::debug!(
            "Context {} posted {:?} on {} ({} listeners)",
            self.origin,
            message.as_str(),
            channel.name(),
            receivers
        );
        Ok(())
    }

    /// Subscribe to both transports.
    ///
    /// Events are only delivered if they are published after this call, so
    /// subscribe before reading the mirror at mount.
    pub fn subscribe(&self) -> Subscription {
        Subscription::new(
            self.origin,
            self.envelope_key.clone(),
            self.channel.as_ref().map(BroadcastChannel::subscribe),
            Some(self.storage.subscribe()),
        )
    }
}
