//! Per-investor orders and queued follow-up actions.
//!
//! An order becomes "stuck" when the epoch it was last updated in has been
//! approved: its pending amount is partially spoken for and can no longer be
//! merged into or cancelled directly. Follow-up intent is queued instead and
//! flushed when the investor claims through the approved epochs.

use serde::{Deserialize, Serialize};

use super::epoch::EpochId;
use crate::domain::shared::AtomAmount;

/// One investor's open order on one side of a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOrder<A> {
    /// Unprocessed amount still waiting for approval or claim.
    pub pending: A,
    /// Epoch the order was created in or last merged into.
    pub last_update: EpochId,
}

impl<A: AtomAmount> UserOrder<A> {
    /// New order placed in the given request epoch.
    #[must_use]
    pub const fn new(pending: A, epoch: EpochId) -> Self {
        Self {
            pending,
            last_update: epoch,
        }
    }

    /// Whether the order sits in an already-approved epoch and can only be
    /// modified through the queue.
    #[must_use]
    pub fn is_stuck(&self, current_request_epoch: EpochId) -> bool {
        !self.pending.is_zero() && self.last_update < current_request_epoch
    }
}

/// Intent recorded against a stuck order, applied after the claim sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueuedAction<A> {
    /// Additional amount to fold into the order once it unsticks.
    Request {
        /// Amount accumulated across queued requests.
        amount: A,
    },
    /// Cancel whatever remains unprocessed once the claim sweep finishes.
    /// The amount is what was already queued as requests at conversion time.
    Cancellation {
        /// Queued request amount returned alongside the remaining pending.
        amount: A,
    },
}

impl<A: AtomAmount> QueuedAction<A> {
    /// The amount carried by the queue entry, whichever kind it is.
    #[must_use]
    pub const fn amount(&self) -> A {
        match self {
            Self::Request { amount } | Self::Cancellation { amount } => *amount,
        }
    }

    /// Whether this entry is a queued cancellation.
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancellation { .. })
    }
}

/// Reportable state of an investor's position on one side of a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    /// No open order and nothing queued.
    Idle,
    /// Pending amount in the current request epoch, not yet approved.
    PendingUnapproved,
    /// Pending amount in an approved epoch, awaiting processing or claim.
    PendingApproved,
    /// Stuck order with an additional request queued behind it.
    QueuedRequest,
    /// Stuck order with a cancellation queued behind it.
    QueuedCancellation,
}
