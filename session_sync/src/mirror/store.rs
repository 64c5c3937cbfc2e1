use std::sync::Arc;

use crate::mirror::codec::{decode_envelope, encode_envelope};
use crate::mirror::errors::MirrorError;
use crate::session::UserData;
use crate::storage::{ContextId, SharedStorage};

/// Serialized copy of a context's session kept in the shared area.
///
/// New contexts rehydrate from it, and its presence or absence is what every
/// context treats as the logged-in or logged-out truth.
#[derive(Clone)]
pub struct DurableMirror {
    storage: Arc<dyn SharedStorage>,
    origin: ContextId,
    key: String,
}

impl DurableMirror {
    pub fn new(storage: Arc<dyn SharedStorage>, origin: ContextId, key: impl Into<String>) -> Self {
        Self {
            storage,
            origin,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn write(&self, user_data: &UserData) -> Result<(), MirrorError> {
        let envelope = encode_envelope(user_data)?;
        self.storage.set(self.origin, &self.key, envelope).await?;
        tracing::debug!("Wrote session envelope under {}", self.key);
        Ok(())
    }

    /// Read the envelope. `Ok(None)` means no envelope, i.e. logged out.
    pub async fn read(&self) -> Result<Option<UserData>, MirrorError> {
        match self.storage.get(&self.key).await? {
            Some(raw) => decode_envelope(&raw).map(Some),
            None => Ok(None),
        }
    }

    pub async fn clear(&self) -> Result<(), MirrorError> {
        self.storage.remove(self.origin, &self.key).await?;
        tracing::debug!("Removed session envelope under {}", self.key);
        Ok(())
    }
}
