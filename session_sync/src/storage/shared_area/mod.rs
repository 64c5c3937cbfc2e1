mod memory;
mod types;

pub use memory::InMemorySharedStorage;
pub use types::SharedStorage;
