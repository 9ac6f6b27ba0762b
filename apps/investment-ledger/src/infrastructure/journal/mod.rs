//! Accounting journal adapters.

mod in_memory;

pub use in_memory::InMemoryJournal;
