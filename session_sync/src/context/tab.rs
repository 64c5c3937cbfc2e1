use std::sync::Arc;

use crate::messenger::{Messenger, Subscription, SyncMessage};
use crate::mirror::{DurableMirror, MIRROR_ENVELOPE_KEY};
use crate::navigation::{Navigator, Route, decide_redirect};
use crate::session::{Session, SessionStore, UserData};
use crate::storage::{CacheInvalidator, ContextId};
use crate::sync::{Reconciler, SyncError, SyncGuard, spawn_sync};

use super::origin::BrowserOrigin;

/// One independent execution context (a browser tab) of an origin.
///
/// The context owns its session store, request cache and navigator, and
/// talks to its siblings only through the origin's shared area and
/// broadcast channel.
pub struct TabContext {
    id: ContextId,
    session: SessionStore,
    mirror: DurableMirror,
    messenger: Messenger,
    reconciler: Reconciler,
    cache: Arc<dyn CacheInvalidator>,
    navigator: Arc<dyn Navigator>,
}

impl TabContext {
    /// Mount a new context on `origin` and rehydrate it from the durable mirror.
    pub async fn open(
        origin: &BrowserOrigin,
        navigator: Arc<dyn Navigator>,
        cache: Arc<dyn CacheInvalidator>,
    ) -> Self {
        let id = ContextId::new();
        let storage = origin.storage();
        let mirror = DurableMirror::new(storage.clone(), id, MIRROR_ENVELOPE_KEY.as_str());
        let session = SessionStore::new(origin.cookies(), mirror.clone());
        let messenger = Messenger::new(
            id,
            origin.broadcast_channel().await,
            storage,
            MIRROR_ENVELOPE_KEY.as_str(),
        );
        let reconciler = Reconciler::new(
            id,
            session.clone(),
            mirror.clone(),
            cache.clone(),
            navigator.clone(),
        );

        let rehydrated = reconciler.resync().await;
        tracing::debug!("Opened context {} at {}: {:?}", id, navigator.current_path(), rehydrated);

        Self {
            id,
            session,
            mirror,
            messenger,
            reconciler,
            cache,
            navigator,
        }
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn current_session(&self) -> Session {
        self.session.current_session()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn navigator(&self) -> Arc<dyn Navigator> {
        self.navigator.clone()
    }

    /// Subscribe to sibling events without starting a listener, for hosts
    /// that feed events to [`TabContext::reconciler`] themselves.
    pub fn subscribe(&self) -> Subscription {
        self.messenger.subscribe()
    }

    /// Start listening for sibling events. The listener stops when the
    /// returned guard is dropped.
    pub fn start_sync(&self) -> SyncGuard {
        spawn_sync(self.reconciler.clone(), self.messenger.subscribe())
    }

    /// Complete a login: update this context, persist the mirror, tell the
    /// siblings and navigate to the dashboard the roles call for.
    #[tracing::instrument(skip(self, user_data), fields(context = %self.id))]
    pub async fn sign_in(&self, user_data: UserData) -> Route {
        if user_data.access_credential.is_none() {
            tracing::warn!("Sign-in without an access credential; staying on the login screen");
            return Route::Login;
        }

        self.session.login(user_data.clone()).await;

        match self.persist_and_announce(&user_data).await {
            Ok(()) => {}
            Err(SyncError::Messenger(e)) => {
                tracing::warn!("Login not broadcast, siblings rely on storage changes: {}", e);
            }
            Err(e) => tracing::error!("Failed to share login with other contexts: {}", e),
        }

        let route = decide_redirect(&self.session.current_session().roles());
        self.navigator.navigate_to(route);
        tracing::info!("Signed in, redirected to {}", route);
        route
    }

    /// Complete a logout: drop cached responses, clear the session, cookie
    /// and mirror, tell the siblings and return to the login screen.
    #[tracing::instrument(skip(self), fields(context = %self.id))]
    pub async fn sign_out(&self) {
        self.cache.invalidate_all().await;
        self.session.logout().await;
        self.broadcast_logout();
        if !self.navigator.is_at(Route::Login) {
            self.navigator.navigate_to(Route::Login);
        }
        tracing::info!("Signed out");
    }

    pub fn broadcast_login(&self) {
        if let Err(e) = self.messenger.publish(SyncMessage::Login) {
            tracing::warn!("Failed to broadcast login: {}", e);
        }
    }

    pub fn broadcast_logout(&self) {
        if let Err(e) = self.messenger.publish(SyncMessage::Logout) {
            tracing::warn!("Failed to broadcast logout: {}", e);
        }
    }

    async fn persist_and_announce(&self, user_data: &UserData) -> Result<(), SyncError> {
        self.mirror.write(user_data).await?;
        self.messenger.publish(SyncMessage::Login)?;
        Ok(())
    }
}
