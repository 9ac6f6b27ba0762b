//! Driven ports of the application layer.

mod event_publisher_port;
mod journal_port;
mod registry_port;

pub use event_publisher_port::{EventPublishError, EventPublisherPort, NoOpEventPublisher};
pub use journal_port::{
    AccountingJournalPort, JournalEntry, JournalError, JournalScopeId, NoOpJournal,
};
pub use registry_port::{AssetRegistryPort, RegistryError};
