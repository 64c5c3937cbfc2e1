use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::storage::types::CacheData;

/// Request/response cache held by a single context.
pub struct InMemoryResponseCache {
    pub(super) entry: Mutex<HashMap<String, CacheData>>,
}

/// Hook used on logout to drop every cached authorized response.
#[async_trait]
pub trait CacheInvalidator: Send + Sync + 'static {
    async fn invalidate_all(&self);
}
