mod cache_store;
mod errors;
mod shared_area;
mod types;

pub use cache_store::{CacheInvalidator, InMemoryResponseCache};
pub use errors::StorageError;
pub use shared_area::{InMemorySharedStorage, SharedStorage};
pub use types::{CacheData, ContextId, StorageChange};
