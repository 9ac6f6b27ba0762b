//! Application use cases (driving side).
//!
//! Each use case orchestrates one slice of the order-flow lifecycle across
//! repositories and ports. Domain rules live in the aggregates; use cases
//! load, delegate, persist and publish.

mod adjust_issuance;
mod approve_epochs;
mod claim_orders;
mod manage_share_classes;
mod process_epochs;
mod queries;
mod submit_requests;

pub use adjust_issuance::AdjustIssuanceUseCase;
pub use approve_epochs::ApproveEpochsUseCase;
pub use claim_orders::ClaimOrdersUseCase;
pub use manage_share_classes::ManageShareClassesUseCase;
pub use process_epochs::ProcessEpochsUseCase;
pub use queries::{InvestorPositionView, LaneView, QueriesUseCase, ShareClassView};
pub use submit_requests::SubmitRequestsUseCase;

use crate::application::ports::{EventPublishError, JournalError, RegistryError};
use crate::domain::investment::errors::InvestmentError;
use crate::domain::share_class::errors::ShareClassError;

/// Error surface of the application layer: domain failures plus failures of
/// the driven ports an operation depends on.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    /// Investment domain rule violation.
    #[error(transparent)]
    Investment(#[from] InvestmentError),

    /// Share class domain rule violation.
    #[error(transparent)]
    ShareClass(#[from] ShareClassError),

    /// Registry lookup failure.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Journal failure.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// Event publish failure.
    #[error(transparent)]
    Publish(#[from] EventPublishError),
}
