mod config;
mod errors;
mod hub;
mod publisher;
mod subscription;
mod types;

pub use config::{SYNC_CHANNEL_CAPACITY, SYNC_CHANNEL_NAME};
pub use errors::MessengerError;
pub use hub::{BroadcastChannel, BroadcastHub};
pub use publisher::Messenger;
pub use subscription::Subscription;
pub use types::{ChannelMessage, SyncEvent, SyncMessage, SyncSignal, Transport};
