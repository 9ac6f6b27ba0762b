//! Asset registry adapters.

mod in_memory;

pub use in_memory::InMemoryAssetRegistry;
