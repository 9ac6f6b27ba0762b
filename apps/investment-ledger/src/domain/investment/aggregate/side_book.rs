//! Order book for one side of a lane.
//!
//! Deposits and redemptions follow identical mechanics, differing only in
//! unit kinds, so one generic book serves both. It owns the per-investor
//! orders, the queued follow-up actions and the unapproved pending
//! aggregate; epoch counters and approval snapshots stay with the lane.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::super::errors::InvestmentError;
use super::super::value_objects::{EpochId, OrderState, QueuedAction, UserOrder};
use crate::domain::shared::{AtomAmount, InvestorId};

/// Epoch data the claim sweep needs from an approved, processed epoch.
#[derive(Debug, Clone, Copy)]
pub struct ClaimEpochData<A, P> {
    /// Pending aggregate captured at approval.
    pub epoch_pending: A,
    /// Amount approved for the epoch.
    pub approved: A,
    /// Total produced by processing the epoch (shares issued or payout).
    pub processed_total: P,
}

/// Result of claiming one epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimOutcome<A, P> {
    /// Investor's pro-rata slice of the processed total.
    pub payout: P,
    /// Amount consumed from the investor's pending order.
    pub consumed: A,
    /// Amount returned by a queued cancellation flushed by this claim.
    pub cancelled: A,
    /// Whether further processed epochs remain claimable.
    pub can_claim_again: bool,
}

/// One side (deposit or redeem) of a lane's order flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SideBook<A: AtomAmount> {
    pending_total: A,
    orders: HashMap<InvestorId, UserOrder<A>>,
    queued: HashMap<InvestorId, QueuedAction<A>>,
}

impl<A: AtomAmount + Default> SideBook<A> {
    /// Aggregate amount pending and not yet approved.
    #[must_use]
    pub const fn pending_total(&self) -> A {
        self.pending_total
    }

    /// Investor's open order, if any.
    #[must_use]
    pub fn order(&self, investor: &InvestorId) -> Option<&UserOrder<A>> {
        self.orders.get(investor)
    }

    /// Investor's queued action, if any.
    #[must_use]
    pub fn queued(&self, investor: &InvestorId) -> Option<&QueuedAction<A>> {
        self.queued.get(investor)
    }

    /// Reportable state of an investor's position.
    #[must_use]
    pub fn state(&self, investor: &InvestorId, now_request: EpochId) -> OrderState {
        match self.queued.get(investor) {
            Some(QueuedAction::Cancellation { .. }) => return OrderState::QueuedCancellation,
            Some(QueuedAction::Request { .. }) => return OrderState::QueuedRequest,
            None => {}
        }
        match self.orders.get(investor) {
            Some(order) if order.is_stuck(now_request) => OrderState::PendingApproved,
            Some(order) if !order.pending.is_zero() => OrderState::PendingUnapproved,
            _ => OrderState::Idle,
        }
    }

    /// Number of processed epochs the investor can still claim through.
    #[must_use]
    pub fn claimable_epochs(&self, investor: &InvestorId, now_processed: EpochId) -> u32 {
        let has_position = self
            .orders
            .get(investor)
            .is_some_and(|o| !o.pending.is_zero())
            || self.queued.contains_key(investor);
        if !has_position {
            return 0;
        }
        let Some(order) = self.orders.get(investor) else {
            return 0;
        };
        now_processed.value().saturating_sub(order.last_update.value())
    }

    /// Place or enlarge a request.
    ///
    /// A request against a stuck order is queued; against a free order it
    /// merges, restamping the order at the current request epoch.
    ///
    /// Returns `true` when the request was queued rather than merged.
    pub fn request(
        &mut self,
        investor: &InvestorId,
        amount: A,
        now_request: EpochId,
    ) -> Result<bool, InvestmentError> {
        if amount.is_zero() {
            return Err(InvestmentError::InvalidInput {
                field: "amount".to_string(),
                message: "request amount must be positive".to_string(),
            });
        }

        match self.queued.get_mut(investor) {
            Some(QueuedAction::Cancellation { .. }) => {
                return Err(InvestmentError::CancellationQueued {
                    investor: investor.as_str().to_string(),
                });
            }
            Some(QueuedAction::Request { amount: queued }) => {
                *queued = queued.checked_add(amount)?;
                return Ok(true);
            }
            None => {}
        }

        if let Some(order) = self.orders.get(investor)
            && order.is_stuck(now_request)
        {
            self.queued
                .insert(investor.clone(), QueuedAction::Request { amount });
            return Ok(true);
        }

        let order = self
            .orders
            .entry(investor.clone())
            .or_insert_with(|| UserOrder::new(A::ZERO, now_request));
        order.pending = order.pending.checked_add(amount)?;
        order.last_update = now_request;
        self.pending_total = self.pending_total.checked_add(amount)?;
        Ok(false)
    }

    /// Cancel a request.
    ///
    /// A free order is removed and its pending amount returned at once. A
    /// stuck order gets a cancellation queued (absorbing any queued request
    /// amount) and nothing is returned until the claim sweep flushes it.
    pub fn cancel(
        &mut self,
        investor: &InvestorId,
        now_request: EpochId,
    ) -> Result<A, InvestmentError> {
        match self.queued.get(investor) {
            Some(QueuedAction::Cancellation { .. }) => {
                return Err(InvestmentError::CancellationQueued {
                    investor: investor.as_str().to_string(),
                });
            }
            Some(QueuedAction::Request { amount }) => {
                let carried = *amount;
                self.queued
                    .insert(investor.clone(), QueuedAction::Cancellation { amount: carried });
                return Ok(A::ZERO);
            }
            None => {}
        }

        let Some(order) = self.orders.get(investor) else {
            return Err(InvestmentError::NoOrderFound {
                investor: investor.as_str().to_string(),
            });
        };
        if order.pending.is_zero() {
            return Err(InvestmentError::NoOrderFound {
                investor: investor.as_str().to_string(),
            });
        }

        if order.is_stuck(now_request) {
            self.queued
                .insert(investor.clone(), QueuedAction::Cancellation { amount: A::ZERO });
            return Ok(A::ZERO);
        }

        let returned = order.pending;
        self.orders.remove(investor);
        self.pending_total = self.pending_total.checked_sub(returned)?;
        Ok(returned)
    }

    /// Consume an approved amount from the pending aggregate.
    ///
    /// Returns the remainder left pending after the approval.
    pub fn approve(&mut self, approved: A) -> Result<A, InvestmentError> {
        if approved.is_zero() {
            return Err(InvestmentError::ZeroApprovalAmount);
        }
        if self.pending_total.is_zero() || approved > self.pending_total {
            return Err(InvestmentError::InsufficientPending {
                approved: approved.to_string(),
                pending: self.pending_total.to_string(),
            });
        }
        self.pending_total = self.pending_total.checked_sub(approved)?;
        Ok(self.pending_total)
    }

    /// Claim the investor's slice of the oldest unclaimed processed epoch.
    ///
    /// `lookup` resolves the snapshot of an approved, processed epoch.
    /// `blocked` is the error to raise when the next epoch is approved but
    /// not yet processed.
    ///
    /// A claim that empties the order, or catches it up to the current
    /// request epoch, also flushes the investor's queued action: a queued
    /// request folds into the order, a queued cancellation returns the
    /// remaining pending plus any carried request amount.
    pub fn claim<P, F>(
        &mut self,
        investor: &InvestorId,
        now_request: EpochId,
        now_processed: EpochId,
        blocked: InvestmentError,
        lookup: F,
    ) -> Result<ClaimOutcome<A, P>, InvestmentError>
    where
        P: AtomAmount,
        F: Fn(EpochId) -> Option<ClaimEpochData<A, P>>,
    {
        let Some(order) = self.orders.get(investor) else {
            return Err(InvestmentError::NoOrderFound {
                investor: investor.as_str().to_string(),
            });
        };
        if order.pending.is_zero() && !self.queued.contains_key(investor) {
            return Err(InvestmentError::NoOrderFound {
                investor: investor.as_str().to_string(),
            });
        }
        if now_processed <= order.last_update {
            return Err(blocked);
        }

        let epoch = order.last_update;
        let data = lookup(epoch).ok_or(InvestmentError::EpochNotFound {
            epoch: epoch.value(),
        })?;

        let pending = order.pending;
        let consumed = pending.mul_div_floor(data.approved.atoms(), data.epoch_pending.atoms())?;
        let payout = data
            .processed_total
            .mul_div_floor(consumed.atoms(), data.approved.atoms())?;

        let order = self
            .orders
            .get_mut(investor)
            .ok_or_else(|| InvestmentError::NoOrderFound {
                investor: investor.as_str().to_string(),
            })?;
        order.pending = order.pending.checked_sub(consumed)?;
        order.last_update = epoch.next();

        let mut cancelled = A::ZERO;
        if order.pending.is_zero() || order.last_update == now_request {
            match self.queued.remove(investor) {
                Some(QueuedAction::Cancellation { amount: carried }) => {
                    let remaining = order.pending;
                    cancelled = remaining.checked_add(carried)?;
                    self.pending_total = self.pending_total.checked_sub(remaining)?;
                    order.pending = A::ZERO;
                    order.last_update = now_request;
                }
                Some(QueuedAction::Request { amount: queued }) => {
                    order.pending = order.pending.checked_add(queued)?;
                    order.last_update = now_request;
                    self.pending_total = self.pending_total.checked_add(queued)?;
                }
                None => {}
            }
        }

        let remaining = order.pending;
        let can_claim_again = !remaining.is_zero() && order.last_update < now_processed;
        if remaining.is_zero() {
            self.orders.remove(investor);
        }

        Ok(ClaimOutcome {
            payout,
            consumed,
            cancelled,
            can_claim_again,
        })
    }
}
