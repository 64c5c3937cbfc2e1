//! session_sync - Cross-context authentication state synchronization
//!
//! This crate keeps one logical login session consistent across independent
//! execution contexts (browser tabs) of the same origin. The contexts share a
//! durable key-value area and a cookie jar, but not memory.
//!
//! A context that signs in or out mutates its own session, persists it to the
//! shared area and announces the change over two redundant transports. Every
//! sibling reconciles those announcements against the persisted copy and
//! decides whether and where to navigate.

mod context;
mod messenger;
mod mirror;
mod navigation;
mod session;
mod storage;
mod sync;

#[cfg(test)]
mod test_utils;

pub use context::{BrowserOrigin, TabContext};

pub use messenger::{
    BroadcastChannel, BroadcastHub, ChannelMessage, Messenger, MessengerError,
    SYNC_CHANNEL_CAPACITY, SYNC_CHANNEL_NAME, Subscription, SyncEvent, SyncMessage, SyncSignal,
    Transport,
};

pub use mirror::{
    DurableMirror, MIRROR_ENVELOPE_KEY, MirrorError, decode_envelope, encode_envelope,
};

pub use navigation::{HistoryState, InMemoryHistory, Navigator, Route, decide_redirect};

pub use session::{
    AUTH_COOKIE_MAX_AGE, AUTH_COOKIE_NAME, CookieJar, Role, Session, SessionError, SessionStore,
    UserData, UserProfile, auth_token_from_headers, header_set_cookie,
};

pub use storage::{
    CacheData, CacheInvalidator, ContextId, InMemoryResponseCache, InMemorySharedStorage,
    SharedStorage, StorageChange, StorageError,
};

pub use sync::{IgnoreReason, Reconciler, Reconciliation, SyncError, SyncGuard, spawn_sync};
