use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use crate::storage::{ContextId, StorageChange};

use super::types::{ChannelMessage, SyncEvent, SyncMessage, SyncSignal, Transport};

/// A context's receiving end of both sync transports.
///
/// Messages from the context itself, changes to unrelated keys and unknown
/// tokens are filtered out. A lagging receiver surfaces as a
/// [`SyncSignal::Resync`]. Dropping the subscription unsubscribes.
pub struct Subscription {
    origin: ContextId,
    envelope_key: String,
    broadcast: Option<broadcast::Receiver<ChannelMessage>>,
    storage: Option<broadcast::Receiver<StorageChange>>,
}

/// Classify a change of the envelope value.
fn classify_change(
    old_value: Option<&str>,
    new_value: Option<&str>,
) -> Option<SyncSignal> {
    match (old_value, new_value) {
        (old, Some(new)) if old != Some(new) => Some(SyncSignal::Login),
        (Some(_), None) => Some(SyncSignal::Logout),
        _ => None,
    }
}

enum Received {
    Broadcast(Result<ChannelMessage, RecvError>),
    Storage(Result<StorageChange, RecvError>),
}

async fn recv_from<T: Clone>(
    receiver: &mut Option<broadcast::Receiver<T>>,
) -> Result<T, RecvError> {
    match receiver {
        Some(receiver) => receiver.recv().await,
        None => std::future::pending().await,
    }
}

impl Subscription {
    pub(crate) fn new(
        origin: ContextId,
        envelope_key: String,
        broadcast: Option<broadcast::Receiver<ChannelMessage>>,
        storage: Option<broadcast::Receiver<StorageChange>>,
    ) -> Self {
        Self {
            origin,
            envelope_key,
            broadcast,
            storage,
        }
    }

    /// True once both transports have shut down.
    pub fn is_closed(&self) -> bool {
        self.broadcast.is_none() && self.storage.is_none()
    }

    /// Wait for the next event from either transport.
    ///
    /// Returns `None` when both transports are closed.
    pub async fn recv(&mut self) -> Option<SyncEvent> {
        loop {
            let received = tokio::select! {
                received = recv_from(&mut self.broadcast), if self.broadcast.is_some() => {
                    Received::Broadcast(received)
                }
                received = recv_from(&mut self.storage), if self.storage.is_some() => {
                    Received::Storage(received)
                }
                else => return None,
            };
            let accepted = match received {
                Received::Broadcast(received) => self.on_broadcast(received),
                Received::Storage(received) => self.on_storage(received),
            };
            if accepted.is_some() {
                return accepted;
            }
        }
    }

    /// Next event that is already queued on either transport, without waiting.
    pub fn try_recv(&mut self) -> Option<SyncEvent> {
        self.try_recv_from(Transport::Broadcast)
            .or_else(|| self.try_recv_from(Transport::Storage))
    }

    /// Next event already queued on one specific transport, without waiting.
    pub fn try_recv_from(&mut self, transport: Transport) -> Option<SyncEvent> {
        loop {
            let accepted = match transport {
                Transport::Broadcast => {
                    let received = non_blocking(self.broadcast.as_mut()?.try_recv())?;
                    self.on_broadcast(received)
                }
                Transport::Storage => {
                    let received = non_blocking(self.storage.as_mut()?.try_recv())?;
                    self.on_storage(received)
                }
            };
            if accepted.is_some() {
                return accepted;
            }
        }
    }

    fn on_broadcast(&mut self, received: Result<ChannelMessage, RecvError>) -> Option<SyncEvent> {
        match received {
            Ok(message) => self.accept_message(message),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(
                    "Context {} missed {} broadcast messages; resyncing",
                    self.origin,
                    skipped
                );
                Some(SyncEvent::new(Transport::Broadcast, SyncSignal::Resync))
            }
            Err(RecvError::Closed) => {
                tracing::warn!("Broadcast transport closed for context {}", self.origin);
                self.broadcast = None;
                None
            }
        }
    }

    fn on_storage(&mut self, received: Result<StorageChange, RecvError>) -> Option<SyncEvent> {
        match received {
            Ok(change) => self.accept_change(change),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(
                    "Context {} missed {} storage changes; resyncing",
                    self.origin,
                    skipped
                );
                Some(SyncEvent::new(Transport::Storage, SyncSignal::Resync))
            }
            Err(RecvError::Closed) => {
                tracing::warn!("Storage transport closed for context {}", self.origin);
                self.storage = None;
                None
            }
        }
    }

    fn accept_message(&self, message: ChannelMessage) -> Option<SyncEvent> {
        if message.origin == self.origin {
            return None;
        }
        match SyncMessage::parse(&message.payload) {
            Some(SyncMessage::Login) => {
                Some(SyncEvent::new(Transport::Broadcast, SyncSignal::Login))
            }
            Some(SyncMessage::Logout) => {
                Some(SyncEvent::new(Transport::Broadcast, SyncSignal::Logout))
            }
            None => {
                tracing::debug!("Ignoring unknown sync token {:?}", message.payload);
                None
            }
        }
    }

    fn accept_change(&self, change: StorageChange) -> Option<SyncEvent> {
        if change.origin == self.origin || change.key != self.envelope_key {
            return None;
        }
        classify_change(change.old_value.as_deref(), change.new_value.as_deref())
            .map(|signal| SyncEvent::new(Transport::Storage, signal))
    }
}

/// Map a non-blocking receive onto the blocking result type. An empty queue
/// yields `None`.
fn non_blocking<T>(received: Result<T, TryRecvError>) -> Option<Result<T, RecvError>> {
    match received {
        Ok(value) => Some(Ok(value)),
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Lagged(skipped)) => Some(Err(RecvError::Lagged(skipped))),
        Err(TryRecvError::Closed) => Some(Err(RecvError::Closed)),
    }
}
