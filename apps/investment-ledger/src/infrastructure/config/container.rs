//! Dependency injection container.
//!
//! Wires repositories, ports, and adapters behind `Arc`s and hands out
//! use cases built over them. Generic over the port implementations so
//! tests can swap any adapter.

use std::sync::Arc;

use crate::application::ports::{
    AccountingJournalPort, AssetRegistryPort, EventPublisherPort, NoOpEventPublisher,
};
use crate::application::use_cases::{
    AdjustIssuanceUseCase, ApproveEpochsUseCase, ClaimOrdersUseCase, ManageShareClassesUseCase,
    ProcessEpochsUseCase, QueriesUseCase, SubmitRequestsUseCase,
};
use crate::domain::investment::LaneRepository;
use crate::domain::share_class::ShareClassRepository;
use crate::infrastructure::journal::InMemoryJournal;
use crate::infrastructure::persistence::{InMemoryLaneRepository, InMemoryShareClassRepository};
use crate::infrastructure::registry::InMemoryAssetRegistry;

/// Container wired entirely with in-memory adapters.
pub type InMemoryContainer = Container<
    InMemoryLaneRepository,
    InMemoryShareClassRepository,
    InMemoryAssetRegistry,
    InMemoryJournal,
    NoOpEventPublisher,
>;

/// Holds every shared dependency and builds use cases from them.
pub struct Container<L, S, R, J, E>
where
    L: LaneRepository,
    S: ShareClassRepository,
    R: AssetRegistryPort,
    J: AccountingJournalPort,
    E: EventPublisherPort,
{
    lanes: Arc<L>,
    share_classes: Arc<S>,
    registry: Arc<R>,
    journal: Arc<J>,
    event_publisher: Arc<E>,
}

impl InMemoryContainer {
    /// Build a container backed by fresh in-memory adapters.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryLaneRepository::new()),
            Arc::new(InMemoryShareClassRepository::new()),
            Arc::new(InMemoryAssetRegistry::new()),
            Arc::new(InMemoryJournal::new()),
            Arc::new(NoOpEventPublisher),
        )
    }
}

impl<L, S, R, J, E> Container<L, S, R, J, E>
where
    L: LaneRepository,
    S: ShareClassRepository,
    R: AssetRegistryPort,
    J: AccountingJournalPort,
    E: EventPublisherPort,
{
    /// Create a container from already-constructed dependencies.
    #[must_use]
    pub const fn new(
        lanes: Arc<L>,
        share_classes: Arc<S>,
        registry: Arc<R>,
        journal: Arc<J>,
        event_publisher: Arc<E>,
    ) -> Self {
        Self {
            lanes,
            share_classes,
            registry,
            journal,
            event_publisher,
        }
    }

    /// Lane repository handle.
    #[must_use]
    pub fn lanes(&self) -> Arc<L> {
        Arc::clone(&self.lanes)
    }

    /// Share class repository handle.
    #[must_use]
    pub fn share_classes(&self) -> Arc<S> {
        Arc::clone(&self.share_classes)
    }

    /// Asset registry handle.
    #[must_use]
    pub fn registry(&self) -> Arc<R> {
        Arc::clone(&self.registry)
    }

    /// Accounting journal handle.
    #[must_use]
    pub fn journal(&self) -> Arc<J> {
        Arc::clone(&self.journal)
    }

    /// Event publisher handle.
    #[must_use]
    pub fn event_publisher(&self) -> Arc<E> {
        Arc::clone(&self.event_publisher)
    }

    /// Use case for creating and maintaining share classes.
    #[must_use]
    pub fn manage_share_classes_use_case(&self) -> ManageShareClassesUseCase<S, E> {
        ManageShareClassesUseCase::new(self.share_classes(), self.event_publisher())
    }

    /// Use case for investor deposit and redemption requests.
    #[must_use]
    pub fn submit_requests_use_case(&self) -> SubmitRequestsUseCase<L, S, J, E> {
        SubmitRequestsUseCase::new(
            self.lanes(),
            self.share_classes(),
            self.journal(),
            self.event_publisher(),
        )
    }

    /// Use case for manager epoch approvals.
    #[must_use]
    pub fn approve_epochs_use_case(&self) -> ApproveEpochsUseCase<L, S, R, E> {
        ApproveEpochsUseCase::new(
            self.lanes(),
            self.share_classes(),
            self.registry(),
            self.event_publisher(),
        )
    }

    /// Use case for issuing and revoking shares against approved epochs.
    #[must_use]
    pub fn process_epochs_use_case(&self) -> ProcessEpochsUseCase<L, S, R, J, E> {
        ProcessEpochsUseCase::new(
            self.lanes(),
            self.share_classes(),
            self.registry(),
            self.journal(),
            self.event_publisher(),
        )
    }

    /// Use case for investor claims.
    #[must_use]
    pub fn claim_orders_use_case(&self) -> ClaimOrdersUseCase<L, S, J, E> {
        ClaimOrdersUseCase::new(
            self.lanes(),
            self.share_classes(),
            self.journal(),
            self.event_publisher(),
        )
    }

    /// Use case for out-of-band issuance adjustments.
    #[must_use]
    pub fn adjust_issuance_use_case(&self) -> AdjustIssuanceUseCase<S, E> {
        AdjustIssuanceUseCase::new(self.share_classes(), self.event_publisher())
    }

    /// Read-side query use case.
    #[must_use]
    pub fn queries_use_case(&self) -> QueriesUseCase<L, S> {
        QueriesUseCase::new(self.lanes(), self.share_classes())
    }
}
