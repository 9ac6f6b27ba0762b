// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Investment Ledger - Rust Core Library
//!
//! Epoch-based investment ledger for tokenized fund share classes.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic (aggregates, value objects, domain events)
//!   - `share_class`: Share class directory, metadata, issuance metrics
//!   - `investment`: Per-(share class, asset) lanes, epoch counters, order
//!     books, approvals, issuance/revocation at NAV, pro-rata claims
//!   - `shared`: Identifiers, atom amounts, prices, precision, timestamps
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Interfaces for external systems (`AssetRegistryPort`,
//!     `AccountingJournalPort`, `EventPublisherPort`)
//!   - `use_cases`: `SubmitRequests`, `ApproveEpochs`, `ProcessEpochs`,
//!     `ClaimOrders`, `ManageShareClasses`, `AdjustIssuance`, `Queries`
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: Share class and lane repositories (in-memory)
//!   - `registry`: Asset precision registry
//!   - `journal`: Double-entry accounting journal
//!   - `config`: Settings and dependency injection container

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// Domain re-exports
pub use domain::investment::{InvestmentError, InvestmentEvent, InvestmentLane, LaneRepository};
pub use domain::share_class::{ShareClass, ShareClassError, ShareClassEvent, ShareClassRepository};
pub use domain::shared::{
    AssetAmount, AssetId, AtomAmount, Decimals, InvestorId, PoolAmount, PoolId, Price, ShareAmount,
    ShareClassId, Timestamp,
};

// Application re-exports
pub use application::ApplicationError;
pub use application::ports::{
    AccountingJournalPort, AssetRegistryPort, EventPublisherPort, JournalEntry, NoOpEventPublisher,
    NoOpJournal,
};
pub use application::use_cases::{
    AdjustIssuanceUseCase, ApproveEpochsUseCase, ClaimOrdersUseCase, ManageShareClassesUseCase,
    ProcessEpochsUseCase, QueriesUseCase, SubmitRequestsUseCase,
};

// Infrastructure re-exports
pub use infrastructure::config::{Container, InMemoryContainer, Settings};
pub use infrastructure::journal::InMemoryJournal;
pub use infrastructure::persistence::{InMemoryLaneRepository, InMemoryShareClassRepository};
pub use infrastructure::registry::InMemoryAssetRegistry;
