//! Investment bounded context.
//!
//! Epoch-based deposit and redemption flow: requests and cancellations,
//! manager approvals, share issuance and revocation at NAV, and pro-rata
//! claims across processed epochs.

pub mod aggregate;
pub mod errors;
pub mod events;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use aggregate::{DepositClaim, EpochIssuance, EpochRevocation, InvestmentLane, RedeemClaim};
pub use errors::InvestmentError;
pub use events::InvestmentEvent;
pub use repository::LaneRepository;
