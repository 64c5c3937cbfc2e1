use std::sync::Arc;

use crate::messenger::{SyncEvent, SyncSignal, Transport};
use crate::mirror::DurableMirror;
use crate::navigation::{Navigator, Route, decide_redirect};
use crate::session::{SessionStore, UserData};
use crate::storage::{CacheInvalidator, ContextId};

/// Why an event left the context untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The mirror holds no credential.
    NoCredential,
    /// The context already reflects the mirror.
    AlreadyCurrent,
    /// A storage-side logout reached a context that was not logged in.
    NotAuthenticated,
    /// The mirror could not be decoded.
    Unreadable,
}

/// Result of handling one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    Ignored(IgnoreReason),
    /// Session applied from the mirror; `redirect` is set when the context
    /// was on the login screen and got sent on.
    LoggedIn { redirect: Option<Route> },
    LoggedOut,
    /// The mirror was unreadable while on the login screen; redirected using
    /// the local roles without touching the session.
    FallbackRedirect(Route),
}

/// Brings one context's session in line with the durable mirror.
///
/// Incoming events are only hints: every handler re-reads the mirror, so
/// duplicated, reordered or stale deliveries converge on the same state.
#[derive(Clone)]
pub struct Reconciler {
    context: ContextId,
    session: SessionStore,
    mirror: DurableMirror,
    cache: Arc<dyn CacheInvalidator>,
    navigator: Arc<dyn Navigator>,
}

impl Reconciler {
    pub fn new(
        context: ContextId,
        session: SessionStore,
        mirror: DurableMirror,
        cache: Arc<dyn CacheInvalidator>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            context,
            session,
            mirror,
            cache,
            navigator,
        }
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    #[tracing::instrument(skip(self), fields(context = %self.context))]
    pub async fn handle(&self, event: SyncEvent) -> Reconciliation {
        let outcome = match event.signal {
            SyncSignal::Login => self.on_login_signal().await,
            SyncSignal::Logout => self.on_logout_signal(event.transport).await,
            SyncSignal::Resync => self.resync().await,
        };

        match outcome {
            Reconciliation::Ignored(reason) => tracing::debug!("Ignored: {:?}", reason),
            _ => tracing::info!("Reconciled: {:?}", outcome),
        }
        outcome
    }

    /// Re-derive the session from the mirror, regardless of what triggered it.
    pub async fn resync(&self) -> Reconciliation {
        match self.mirror.read().await {
            Ok(Some(data)) if data.access_credential.is_some() => self.apply_login(data).await,
            Ok(_) if self.session.current_session().authenticated => self.apply_logout().await,
            Ok(_) => Reconciliation::Ignored(IgnoreReason::AlreadyCurrent),
            Err(e) => {
                tracing::warn!("Cannot resync from session envelope: {}", e);
                Reconciliation::Ignored(IgnoreReason::Unreadable)
            }
        }
    }

    async fn on_login_signal(&self) -> Reconciliation {
        match self.mirror.read().await {
            Ok(Some(data)) => self.apply_login(data).await,
            Ok(None) => Reconciliation::Ignored(IgnoreReason::NoCredential),
            Err(e) => {
                tracing::warn!("Failed to read session envelope after login: {}", e);
                if self.navigator.is_at(Route::Login) {
                    // Best effort so a login elsewhere is not silently missed
                    let route = decide_redirect(&self.session.current_session().roles());
                    self.navigator.navigate_to(route);
                    Reconciliation::FallbackRedirect(route)
                } else {
                    Reconciliation::Ignored(IgnoreReason::Unreadable)
                }
            }
        }
    }

    /// A logout signal only says the mirror was cleared at some point. If it
    /// holds a credential now, a later login won and the mirror is followed.
    async fn on_logout_signal(&self, transport: Transport) -> Reconciliation {
        match self.mirror.read().await {
            Ok(Some(data)) if data.access_credential.is_some() => {
                tracing::debug!("Stale logout, session envelope holds a newer login");
                return self.apply_login(data).await;
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to read session envelope after logout: {}", e),
        }

        if transport == Transport::Storage && !self.session.current_session().authenticated {
            return Reconciliation::Ignored(IgnoreReason::NotAuthenticated);
        }
        self.apply_logout().await
    }

    async fn apply_login(&self, data: UserData) -> Reconciliation {
        let Some(credential) = data.access_credential.as_deref() else {
            return Reconciliation::Ignored(IgnoreReason::NoCredential);
        };

        let current = self.session.current_session();
        if current.authenticated && current.credential() == Some(credential) {
            return Reconciliation::Ignored(IgnoreReason::AlreadyCurrent);
        }

        self.session.login(data).await;

        let redirect = if self.navigator.is_at(Route::Login) {
            let route = decide_redirect(&self.session.current_session().roles());
            self.navigator.navigate_to(route);
            Some(route)
        } else {
            None
        };
        Reconciliation::LoggedIn { redirect }
    }

    /// Only called once the mirror was seen without a credential, so the
    /// envelope itself is left alone.
    async fn apply_logout(&self) -> Reconciliation {
        self.cache.invalidate_all().await;
        self.session.logout_local().await;
        if !self.navigator.is_at(Route::Login) {
            self.navigator.navigate_to(Route::Login);
        }
        Reconciliation::LoggedOut
    }
}
