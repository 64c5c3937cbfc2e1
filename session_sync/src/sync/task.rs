use tokio::task::JoinHandle;

use crate::messenger::Subscription;
use crate::storage::ContextId;

use super::reconciler::Reconciler;

/// Handle to a running sync listener. Dropping it stops the listener.
pub struct SyncGuard {
    context: ContextId,
    handle: Option<JoinHandle<()>>,
}

impl SyncGuard {
    pub fn context(&self) -> ContextId {
        self.context
    }

    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .is_none_or(|handle| handle.is_finished())
    }

    /// Stop the listener and wait until it has wound down.
    pub async fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            match handle.await {
                Err(e) if !e.is_cancelled() => {
                    tracing::error!("Sync listener for context {} failed: {}", self.context, e);
                }
                _ => {}
            }
        }
    }
}

impl Drop for SyncGuard {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Run `reconciler` against every event of `subscription` on a background task.
///
/// The listener first resyncs from the mirror, so anything that happened
/// between subscribing and spawning is picked up.
pub fn spawn_sync(reconciler: Reconciler, mut subscription: Subscription) -> SyncGuard {
    let context = reconciler.context();
    let handle = tokio::spawn(async move {
        tracing::debug!("Sync listener started for context {}", context);
        reconciler.resync().await;
        while let Some(event) = subscription.recv().await {
            reconciler.handle(event).await;
        }
        tracing::debug!("Sync listener for context {} stopped: transports closed", context);
    });
    SyncGuard {
        context,
        handle: Some(handle),
    }
}
