mod errors;
mod reconciler;
mod task;

pub use errors::SyncError;
pub use reconciler::{IgnoreReason, Reconciler, Reconciliation};
pub use task::{SyncGuard, spawn_sync};
