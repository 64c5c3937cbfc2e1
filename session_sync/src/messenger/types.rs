use crate::storage::ContextId;

/// Opaque token posted on the broadcast channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMessage {
    Login,
    Logout,
}

impl SyncMessage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMessage::Login => "login",
            SyncMessage::Logout => "logout",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "login" => Some(SyncMessage::Login),
            "logout" => Some(SyncMessage::Logout),
            _ => None,
        }
    }
}

/// Message as it travels over a [`super::BroadcastChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMessage {
    pub origin: ContextId,
    pub payload: String,
}

/// Which of the two redundant transports delivered an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Broadcast,
    Storage,
}

/// What a sibling context is telling us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncSignal {
    /// A login happened somewhere; re-read the mirror.
    Login,
    /// A logout happened somewhere.
    Logout,
    /// Events were lost; re-derive local state from the mirror.
    Resync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncEvent {
    pub transport: Transport,
    pub signal: SyncSignal,
}

impl SyncEvent {
    pub fn new(transport: Transport, signal: SyncSignal) -> Self {
        Self { transport, signal }
    }
}
