use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};

use crate::storage::ContextId;

use super::types::ChannelMessage;

/// Registry of named broadcast channels for one origin.
#[derive(Clone)]
pub struct BroadcastHub {
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<ChannelMessage>>>>,
    capacity: usize,
}

/// Handle to one named channel. Every handle to the same name reaches the
/// same subscribers.
#[derive(Clone)]
pub struct BroadcastChannel {
    name: String,
    sender: broadcast::Sender<ChannelMessage>,
}

impl BroadcastHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Open the channel called `name`, creating it on first use.
    pub async fn channel(&self, name: &str) -> BroadcastChannel {
        let mut channels = self.channels.lock().await;
        let sender = channels
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!("Creating broadcast channel {}", name);
                broadcast::channel(self.capacity).0
            })
            .clone();
        BroadcastChannel {
            name: name.to_string(),
            sender,
        }
    }
}

impl BroadcastChannel {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Post `payload`. Returns how many subscribers, including the sender's
    /// own, were listening.
    pub fn post(&self, origin: ContextId, payload: &str) -> usize {
        let message = ChannelMessage {
            origin,
            payload: payload.to_string(),
        };
        match self.sender.send(message) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::trace!("Nobody listening on channel {}", self.name);
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChannelMessage> {
        self.sender.subscribe()
    }

    /// Number of live subscriptions on this channel, across all handles
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
