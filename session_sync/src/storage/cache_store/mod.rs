mod memory;
mod types;

pub use types::{CacheInvalidator, InMemoryResponseCache};
