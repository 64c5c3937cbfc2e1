use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MirrorError {
    #[error("Malformed session envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Failed to encode session envelope: {0}")]
    Encode(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
