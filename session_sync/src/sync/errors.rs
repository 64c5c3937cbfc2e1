use thiserror::Error;

use crate::messenger::MessengerError;
use crate::mirror::MirrorError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Mirror error: {0}")]
    Mirror(#[from] MirrorError),

    #[error("Messenger error: {0}")]
    Messenger(#[from] MessengerError),
}
