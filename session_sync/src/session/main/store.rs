use http::HeaderMap;
use std::sync::Arc;
use tokio::sync::watch;

use crate::mirror::DurableMirror;
use crate::session::config::{AUTH_COOKIE_MAX_AGE, AUTH_COOKIE_NAME};
use crate::session::errors::SessionError;
use crate::session::types::{Session, UserData};

use super::cookie::{CookieJar, header_set_cookie};

/// Canonical in-memory session of one context.
///
/// The store starts empty and changes only through [`SessionStore::login`] and
/// [`SessionStore::logout`]. Clones share the same state, so the reconciler
/// and the UI of a context can each hold a handle.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<watch::Sender<Session>>,
    cookies: CookieJar,
    mirror: DurableMirror,
}

impl SessionStore {
    pub fn new(cookies: CookieJar, mirror: DurableMirror) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            state: Arc::new(state),
            cookies,
            mirror,
        }
    }

    /// Snapshot of the current session
    pub fn current_session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver that observes every session change, for route guards and views.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Mark the context authenticated with `user_data` and write the auth cookie.
    ///
    /// User data without a credential leaves the session untouched.
    pub async fn login(&self, user_data: UserData) {
        let Some(credential) = user_data.access_credential.clone() else {
            tracing::warn!("Ignoring login without an access credential");
            return;
        };

        self.state.send_replace(Session {
            authenticated: true,
            user_data,
        });

        if let Err(e) = self
            .write_auth_cookie(&credential, *AUTH_COOKIE_MAX_AGE)
            .await
        {
            tracing::error!("Failed to write auth cookie: {}", e);
        }
    }

    /// Clear the session, expire the auth cookie and delete the durable mirror entry.
    pub async fn logout(&self) {
        self.logout_local().await;
        if let Err(e) = self.mirror.clear().await {
            tracing::error!("Failed to clear session envelope: {}", e);
        }
    }

    /// Clear the session and expire the auth cookie, leaving the durable
    /// mirror alone. For contexts following a logout they observed in the
    /// mirror rather than performed.
    pub async fn logout_local(&self) {
        self.state.send_replace(Session::default());

        if let Err(e) = self.write_auth_cookie("", 0).await {
            tracing::error!("Failed to expire auth cookie: {}", e);
        }
    }

    async fn write_auth_cookie(&self, value: &str, max_age: i64) -> Result<(), SessionError> {
        let mut headers = HeaderMap::new();
        header_set_cookie(&mut headers, AUTH_COOKIE_NAME.as_str(), value, max_age)?;
        self.cookies.apply_set_cookie(&headers).await
    }
}
