//! Investment ledger errors.
//!
//! Every error aborts the whole operation; no partial state is retained and
//! nothing is retried internally.

use std::fmt;

use crate::domain::shared::DomainError;

/// Errors raised by the epoch-based order flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvestmentError {
    /// Referenced share class does not exist.
    ShareClassNotFound {
        /// Share class id.
        id: String,
    },

    /// Investor has neither a pending order nor a queued entry.
    NoOrderFound {
        /// Investor id.
        investor: String,
    },

    /// Epoch id is beyond the latest approved epoch.
    EpochNotFound {
        /// Requested epoch id.
        epoch: u32,
    },

    /// Epoch id does not match the lane's current counter.
    EpochNotInSequence {
        /// Epoch id the caller supplied.
        got: u32,
        /// Current counter value.
        expected: u32,
    },

    /// Approval amount is zero.
    ZeroApprovalAmount,

    /// Approval exceeds the pending aggregate, or nothing is pending.
    InsufficientPending {
        /// Requested approval in atoms.
        approved: String,
        /// Pending aggregate in atoms.
        pending: String,
    },

    /// Deposit claim requires the next epoch to be issued first.
    IssuanceRequired,

    /// Redeem claim requires the next epoch to be revoked first.
    RevocationRequired,

    /// A cancellation is already queued on this side; no further request or
    /// cancel is accepted until the queue is flushed by a claim.
    CancellationQueued {
        /// Investor id.
        investor: String,
    },

    /// Revocation would burn more shares than are currently issued.
    RevokeMoreThanIssued {
        /// Shares the epoch would revoke.
        approved: String,
        /// Currently issued shares.
        issued: String,
    },

    /// Checked arithmetic overflowed.
    AmountOverflow {
        /// Operation that overflowed.
        operation: String,
    },

    /// A supplied value failed validation (price, ratio, precision).
    InvalidInput {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },
}

impl fmt::Display for InvestmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShareClassNotFound { id } => write!(f, "Share class not found: {id}"),
            Self::NoOrderFound { investor } => {
                write!(f, "No order or queued entry for investor: {investor}")
            }
            Self::EpochNotFound { epoch } => {
                write!(f, "Epoch not found (not yet approved): {epoch}")
            }
            Self::EpochNotInSequence { got, expected } => {
                write!(f, "Epoch {got} out of sequence, expected {expected}")
            }
            Self::ZeroApprovalAmount => write!(f, "Approval amount must be positive"),
            Self::InsufficientPending { approved, pending } => {
                write!(
                    f,
                    "Approval of {approved} exceeds pending aggregate {pending}"
                )
            }
            Self::IssuanceRequired => {
                write!(f, "No issued epoch to claim; issuance required first")
            }
            Self::RevocationRequired => {
                write!(f, "No revoked epoch to claim; revocation required first")
            }
            Self::CancellationQueued { investor } => {
                write!(f, "Cancellation already queued for investor: {investor}")
            }
            Self::RevokeMoreThanIssued { approved, issued } => {
                write!(f, "Cannot revoke {approved} shares, only {issued} issued")
            }
            Self::AmountOverflow { operation } => {
                write!(f, "Arithmetic overflow in {operation}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
        }
    }
}

impl std::error::Error for InvestmentError {}

impl From<DomainError> for InvestmentError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Overflow { operation } => Self::AmountOverflow { operation },
            DomainError::InvalidValue { field, message } => Self::InvalidInput { field, message },
        }
    }
}
