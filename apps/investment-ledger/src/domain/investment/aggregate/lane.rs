//! Investment lane aggregate.
//!
//! One lane per (share class, payment asset) pair. The lane owns the deposit
//! and redemption side books, the four epoch counters and the approval
//! snapshots, and is the consistency boundary for every order-flow rule:
//! nothing outside a single lane is read or written by its operations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::errors::InvestmentError;
use super::super::events::InvestmentEvent;
use super::super::services::conversion;
use super::super::value_objects::{
    EpochCounters, EpochId, EpochInvestAmounts, EpochRedeemAmounts, OrderState,
};
use super::side_book::{ClaimEpochData, SideBook};
use crate::domain::shared::{
    AssetAmount, AssetId, AtomAmount, Decimals, InvestorId, PoolAmount, Price, ShareAmount,
    ShareClassId, Timestamp,
};

/// Result of issuing shares for one deposit epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochIssuance {
    /// Issued epoch.
    pub epoch_id: EpochId,
    /// NAV per share applied.
    pub nav: Price,
    /// Shares minted for the epoch. Added to the share class issuance total.
    pub issued_shares: ShareAmount,
}

/// Result of revoking shares for one redemption epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochRevocation {
    /// Revoked epoch.
    pub epoch_id: EpochId,
    /// NAV per share applied.
    pub nav: Price,
    /// Shares burned. Subtracted from the share class issuance total.
    pub revoked_shares: ShareAmount,
    /// Pool-denominated payout for the burned shares.
    pub payout_pool: PoolAmount,
    /// Asset-denominated payout owed to claimants, converted at the epoch's
    /// approval price.
    pub payout_asset: AssetAmount,
}

/// Result of one deposit claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositClaim {
    /// Shares delivered to the investor.
    pub payout_shares: ShareAmount,
    /// Asset atoms consumed from the investor's pending order.
    pub payment_assets: AssetAmount,
    /// Asset atoms returned by a flushed queued cancellation.
    pub cancelled_assets: AssetAmount,
    /// Whether further issued epochs remain claimable.
    pub can_claim_again: bool,
}

/// Result of one redemption claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemClaim {
    /// Asset atoms delivered to the investor.
    pub payout_assets: AssetAmount,
    /// Share atoms consumed from the investor's pending order.
    pub payment_shares: ShareAmount,
    /// Share atoms returned by a flushed queued cancellation.
    pub cancelled_shares: ShareAmount,
    /// Whether further revoked epochs remain claimable.
    pub can_claim_again: bool,
}

/// Epoch-based order flow for one (share class, asset) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentLane {
    share_class_id: ShareClassId,
    asset_id: AssetId,
    counters: EpochCounters,
    deposits: SideBook<AssetAmount>,
    redemptions: SideBook<ShareAmount>,
    invest_epochs: BTreeMap<EpochId, EpochInvestAmounts>,
    redeem_epochs: BTreeMap<EpochId, EpochRedeemAmounts>,
    #[serde(skip)]
    events: Vec<InvestmentEvent>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl InvestmentLane {
    /// Create a fresh lane with all counters at epoch 1.
    #[must_use]
    pub fn new(share_class_id: ShareClassId, asset_id: AssetId, now: Timestamp) -> Self {
        Self {
            share_class_id,
            asset_id,
            counters: EpochCounters::default(),
            deposits: SideBook::default(),
            redemptions: SideBook::default(),
            invest_epochs: BTreeMap::new(),
            redeem_epochs: BTreeMap::new(),
            events: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Share class this lane belongs to.
    #[must_use]
    pub const fn share_class_id(&self) -> &ShareClassId {
        &self.share_class_id
    }

    /// Payment asset of this lane.
    #[must_use]
    pub const fn asset_id(&self) -> &AssetId {
        &self.asset_id
    }

    /// Current values of the four epoch counters.
    #[must_use]
    pub const fn counters(&self) -> &EpochCounters {
        &self.counters
    }

    /// Unapproved pending deposit aggregate.
    #[must_use]
    pub const fn pending_deposits(&self) -> AssetAmount {
        self.deposits.pending_total()
    }

    /// Unapproved pending redemption aggregate.
    #[must_use]
    pub const fn pending_redemptions(&self) -> ShareAmount {
        self.redemptions.pending_total()
    }

    /// Approval snapshot of a deposit epoch.
    #[must_use]
    pub fn invest_epoch(&self, epoch: EpochId) -> Option<&EpochInvestAmounts> {
        self.invest_epochs.get(&epoch)
    }

    /// Approval snapshot of a redemption epoch.
    #[must_use]
    pub fn redeem_epoch(&self, epoch: EpochId) -> Option<&EpochRedeemAmounts> {
        self.redeem_epochs.get(&epoch)
    }

    /// State of an investor's deposit position.
    #[must_use]
    pub fn deposit_state(&self, investor: &InvestorId) -> OrderState {
        self.deposits.state(investor, self.counters.deposit.current())
    }

    /// State of an investor's redemption position.
    #[must_use]
    pub fn redeem_state(&self, investor: &InvestorId) -> OrderState {
        self.redemptions
            .state(investor, self.counters.redeem.current())
    }

    /// Investor's pending deposit atoms.
    #[must_use]
    pub fn deposit_pending(&self, investor: &InvestorId) -> AssetAmount {
        self.deposits
            .order(investor)
            .map_or(AssetAmount::ZERO, |o| o.pending)
    }

    /// Investor's pending redemption atoms.
    #[must_use]
    pub fn redeem_pending(&self, investor: &InvestorId) -> ShareAmount {
        self.redemptions
            .order(investor)
            .map_or(ShareAmount::ZERO, |o| o.pending)
    }

    /// Atoms queued behind the investor's deposit order.
    #[must_use]
    pub fn deposit_queued(&self, investor: &InvestorId) -> AssetAmount {
        self.deposits
            .queued(investor)
            .map_or(AssetAmount::ZERO, |q| q.amount())
    }

    /// Atoms queued behind the investor's redemption order.
    #[must_use]
    pub fn redeem_queued(&self, investor: &InvestorId) -> ShareAmount {
        self.redemptions
            .queued(investor)
            .map_or(ShareAmount::ZERO, |q| q.amount())
    }

    /// Number of issued epochs the investor can still claim deposits from.
    #[must_use]
    pub fn max_deposit_claims(&self, investor: &InvestorId) -> u32 {
        self.deposits
            .claimable_epochs(investor, self.counters.issue.current())
    }

    /// Number of revoked epochs the investor can still claim redemptions
    /// from.
    #[must_use]
    pub fn max_redeem_claims(&self, investor: &InvestorId) -> u32 {
        self.redemptions
            .claimable_epochs(investor, self.counters.revoke.current())
    }

    /// Place or enlarge a deposit request. Returns true when queued.
    pub fn request_deposit(
        &mut self,
        investor: &InvestorId,
        amount: AssetAmount,
        now: Timestamp,
    ) -> Result<bool, InvestmentError> {
        let epoch = self.counters.deposit.current();
        let old_pending = self.deposit_pending(investor);
        let queued = self.deposits.request(investor, amount, epoch)?;
        self.record(
            InvestmentEvent::DepositRequested {
                share_class_id: self.share_class_id.clone(),
                asset_id: self.asset_id.clone(),
                investor_id: investor.clone(),
                amount,
                epoch_id: epoch,
                queued,
                old_pending,
                new_pending: self.deposit_pending(investor),
                queued_amount: self.deposit_queued(investor),
                occurred_at: now,
            },
            now,
        );
        Ok(queued)
    }

    /// Cancel a deposit request. Returns the atoms handed back immediately;
    /// zero when the cancellation was queued.
    pub fn cancel_deposit(
        &mut self,
        investor: &InvestorId,
        now: Timestamp,
    ) -> Result<AssetAmount, InvestmentError> {
        let epoch = self.counters.deposit.current();
        let old_pending = self.deposit_pending(investor);
        let returned = self.deposits.cancel(investor, epoch)?;
        let queued = returned.is_zero();
        self.record(
            InvestmentEvent::DepositCancelled {
                share_class_id: self.share_class_id.clone(),
                asset_id: self.asset_id.clone(),
                investor_id: investor.clone(),
                returned,
                epoch_id: epoch,
                queued,
                old_pending,
                new_pending: self.deposit_pending(investor),
                queued_amount: self.deposit_queued(investor),
                occurred_at: now,
            },
            now,
        );
        Ok(returned)
    }

    /// Place or enlarge a redemption request. Returns true when queued.
    pub fn request_redeem(
        &mut self,
        investor: &InvestorId,
        amount: ShareAmount,
        now: Timestamp,
    ) -> Result<bool, InvestmentError> {
        let epoch = self.counters.redeem.current();
        let old_pending = self.redeem_pending(investor);
        let queued = self.redemptions.request(investor, amount, epoch)?;
        self.record(
            InvestmentEvent::RedeemRequested {
                share_class_id: self.share_class_id.clone(),
                asset_id: self.asset_id.clone(),
                investor_id: investor.clone(),
                amount,
                epoch_id: epoch,
                queued,
                old_pending,
                new_pending: self.redeem_pending(investor),
                queued_amount: self.redeem_queued(investor),
                occurred_at: now,
            },
            now,
        );
        Ok(queued)
    }

    /// Cancel a redemption request. Returns the atoms handed back
    /// immediately; zero when the cancellation was queued.
    pub fn cancel_redeem(
        &mut self,
        investor: &InvestorId,
        now: Timestamp,
    ) -> Result<ShareAmount, InvestmentError> {
        let epoch = self.counters.redeem.current();
        let old_pending = self.redeem_pending(investor);
        let returned = self.redemptions.cancel(investor, epoch)?;
        let queued = returned.is_zero();
        self.record(
            InvestmentEvent::RedeemCancelled {
                share_class_id: self.share_class_id.clone(),
                asset_id: self.asset_id.clone(),
                investor_id: investor.clone(),
                returned,
                epoch_id: epoch,
                queued,
                old_pending,
                new_pending: self.redeem_pending(investor),
                queued_amount: self.redeem_queued(investor),
                occurred_at: now,
            },
            now,
        );
        Ok(returned)
    }

    /// Approve part of the pending deposit aggregate for the given epoch,
    /// fixing the asset/pool price. Returns the pending remainder.
    ///
    /// The epoch must be exactly the lane's current deposit epoch; the
    /// counter then advances so later requests land in the next epoch.
    pub fn approve_deposits(
        &mut self,
        epoch: EpochId,
        approved: AssetAmount,
        price: Price,
        asset_dec: Decimals,
        pool_dec: Decimals,
        now: Timestamp,
    ) -> Result<AssetAmount, InvestmentError> {
        let current = self.counters.deposit.current();
        if epoch != current {
            return Err(InvestmentError::EpochNotInSequence {
                got: epoch.value(),
                expected: current.value(),
            });
        }
        price.validate_positive()?;

        let approved_pool = conversion::asset_to_pool(approved, price, asset_dec, pool_dec)?;
        let pending_at_approval = self.deposits.pending_total();
        let remainder = self.deposits.approve(approved)?;
        self.counters.deposit.ensure_and_advance(epoch)?;

        self.invest_epochs.insert(
            epoch,
            EpochInvestAmounts::approved(pending_at_approval, approved, approved_pool, price),
        );
        self.record(
            InvestmentEvent::DepositsApproved {
                share_class_id: self.share_class_id.clone(),
                asset_id: self.asset_id.clone(),
                epoch_id: epoch,
                approved_asset: approved,
                approved_pool,
                price,
                remainder,
                occurred_at: now,
            },
            now,
        );
        Ok(remainder)
    }

    /// Approve part of the pending redemption aggregate for the given epoch,
    /// fixing the asset/pool price used later for the payout conversion.
    /// Returns the pending remainder.
    pub fn approve_redeems(
        &mut self,
        epoch: EpochId,
        approved: ShareAmount,
        price: Price,
        now: Timestamp,
    ) -> Result<ShareAmount, InvestmentError> {
        let current = self.counters.redeem.current();
        if epoch != current {
            return Err(InvestmentError::EpochNotInSequence {
                got: epoch.value(),
                expected: current.value(),
            });
        }
        price.validate_positive()?;

        let pending_at_approval = self.redemptions.pending_total();
        let remainder = self.redemptions.approve(approved)?;
        self.counters.redeem.ensure_and_advance(epoch)?;

        self.redeem_epochs.insert(
            epoch,
            EpochRedeemAmounts::approved(pending_at_approval, approved, price),
        );
        self.record(
            InvestmentEvent::RedeemsApproved {
                share_class_id: self.share_class_id.clone(),
                asset_id: self.asset_id.clone(),
                epoch_id: epoch,
                approved_shares: approved,
                price,
                remainder,
                occurred_at: now,
            },
            now,
        );
        Ok(remainder)
    }

    /// Issue shares for an approved deposit epoch at the given NAV.
    ///
    /// Epochs are issued strictly in order; an epoch that was never approved
    /// does not exist yet.
    pub fn issue_shares(
        &mut self,
        epoch: EpochId,
        nav: Price,
        now: Timestamp,
    ) -> Result<EpochIssuance, InvestmentError> {
        if epoch >= self.counters.deposit.current() {
            return Err(InvestmentError::EpochNotFound {
                epoch: epoch.value(),
            });
        }
        let current = self.counters.issue.current();
        if epoch != current {
            return Err(InvestmentError::EpochNotInSequence {
                got: epoch.value(),
                expected: current.value(),
            });
        }
        nav.validate_positive()?;

        let snapshot =
            self.invest_epochs
                .get_mut(&epoch)
                .ok_or(InvestmentError::EpochNotFound {
                    epoch: epoch.value(),
                })?;
        let issued_shares = conversion::pool_to_shares(snapshot.approved_pool, nav)?;
        snapshot.stamp_issuance(nav, issued_shares, now);
        self.counters.issue.ensure_and_advance(epoch)?;

        self.record(
            InvestmentEvent::SharesIssued {
                share_class_id: self.share_class_id.clone(),
                asset_id: self.asset_id.clone(),
                epoch_id: epoch,
                nav,
                issued_shares,
                occurred_at: now,
            },
            now,
        );
        Ok(EpochIssuance {
            epoch_id: epoch,
            nav,
            issued_shares,
        })
    }

    /// Revoke shares for an approved redemption epoch at the given NAV.
    ///
    /// `total_issuance` is the share class's issued total before this
    /// revocation; burning more than is issued is rejected before any state
    /// changes.
    pub fn revoke_shares(
        &mut self,
        epoch: EpochId,
        nav: Price,
        asset_dec: Decimals,
        pool_dec: Decimals,
        total_issuance: ShareAmount,
        now: Timestamp,
    ) -> Result<EpochRevocation, InvestmentError> {
        if epoch >= self.counters.redeem.current() {
            return Err(InvestmentError::EpochNotFound {
                epoch: epoch.value(),
            });
        }
        let current = self.counters.revoke.current();
        if epoch != current {
            return Err(InvestmentError::EpochNotInSequence {
                got: epoch.value(),
                expected: current.value(),
            });
        }
        nav.validate_positive()?;

        let snapshot =
            self.redeem_epochs
                .get_mut(&epoch)
                .ok_or(InvestmentError::EpochNotFound {
                    epoch: epoch.value(),
                })?;
        let revoked_shares = snapshot.approved_shares;
        if revoked_shares > total_issuance {
            return Err(InvestmentError::RevokeMoreThanIssued {
                approved: revoked_shares.to_string(),
                issued: total_issuance.to_string(),
            });
        }

        let payout_pool = conversion::shares_to_pool(revoked_shares, nav)?;
        let payout_asset =
            conversion::pool_to_asset(payout_pool, snapshot.price, asset_dec, pool_dec)?;
        snapshot.stamp_revocation(nav, payout_pool, payout_asset, now);
        self.counters.revoke.ensure_and_advance(epoch)?;

        self.record(
            InvestmentEvent::SharesRevoked {
                share_class_id: self.share_class_id.clone(),
                asset_id: self.asset_id.clone(),
                epoch_id: epoch,
                nav,
                revoked_shares,
                payout_pool,
                payout_asset,
                occurred_at: now,
            },
            now,
        );
        Ok(EpochRevocation {
            epoch_id: epoch,
            nav,
            revoked_shares,
            payout_pool,
            payout_asset,
        })
    }

    /// Claim the investor's slice of the oldest unclaimed issued epoch.
    pub fn claim_deposit(
        &mut self,
        investor: &InvestorId,
        now: Timestamp,
    ) -> Result<DepositClaim, InvestmentError> {
        let now_request = self.counters.deposit.current();
        let now_issued = self.counters.issue.current();
        let claimed_epoch = self
            .deposits
            .order(investor)
            .map_or(now_request, |o| o.last_update);
        let old_pending = self.deposit_pending(investor);

        let invest_epochs = &self.invest_epochs;
        let outcome = self.deposits.claim(
            investor,
            now_request,
            now_issued,
            InvestmentError::IssuanceRequired,
            |epoch| {
                invest_epochs.get(&epoch).and_then(|snapshot| {
                    snapshot.issued_shares.map(|issued| ClaimEpochData {
                        epoch_pending: snapshot.pending_asset,
                        approved: snapshot.approved_asset,
                        processed_total: issued,
                    })
                })
            },
        )?;

        self.record(
            InvestmentEvent::DepositClaimed {
                share_class_id: self.share_class_id.clone(),
                asset_id: self.asset_id.clone(),
                investor_id: investor.clone(),
                epoch_id: claimed_epoch,
                payout_shares: outcome.payout,
                payment_assets: outcome.consumed,
                cancelled_assets: outcome.cancelled,
                old_pending,
                new_pending: self.deposit_pending(investor),
                occurred_at: now,
            },
            now,
        );
        Ok(DepositClaim {
            payout_shares: outcome.payout,
            payment_assets: outcome.consumed,
            cancelled_assets: outcome.cancelled,
            can_claim_again: outcome.can_claim_again,
        })
    }

    /// Claim the investor's slice of the oldest unclaimed revoked epoch.
    pub fn claim_redeem(
        &mut self,
        investor: &InvestorId,
        now: Timestamp,
    ) -> Result<RedeemClaim, InvestmentError> {
        let now_request = self.counters.redeem.current();
        let now_revoked = self.counters.revoke.current();
        let claimed_epoch = self
            .redemptions
            .order(investor)
            .map_or(now_request, |o| o.last_update);
        let old_pending = self.redeem_pending(investor);

        let redeem_epochs = &self.redeem_epochs;
        let outcome = self.redemptions.claim(
            investor,
            now_request,
            now_revoked,
            InvestmentError::RevocationRequired,
            |epoch| {
                redeem_epochs.get(&epoch).and_then(|snapshot| {
                    snapshot.payout_asset.map(|payout| ClaimEpochData {
                        epoch_pending: snapshot.pending_shares,
                        approved: snapshot.approved_shares,
                        processed_total: payout,
                    })
                })
            },
        )?;

        self.record(
            InvestmentEvent::RedeemClaimed {
                share_class_id: self.share_class_id.clone(),
                asset_id: self.asset_id.clone(),
                investor_id: investor.clone(),
                epoch_id: claimed_epoch,
                payout_assets: outcome.payout,
                payment_shares: outcome.consumed,
                cancelled_shares: outcome.cancelled,
                old_pending,
                new_pending: self.redeem_pending(investor),
                occurred_at: now,
            },
            now,
        );
        Ok(RedeemClaim {
            payout_assets: outcome.payout,
            payment_shares: outcome.consumed,
            cancelled_shares: outcome.cancelled,
            can_claim_again: outcome.can_claim_again,
        })
    }

    /// Drain accumulated domain events.
    pub fn drain_events(&mut self) -> Vec<InvestmentEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events accumulated since the last drain.
    #[must_use]
    pub fn pending_events(&self) -> &[InvestmentEvent] {
        &self.events
    }

    fn record(&mut self, event: InvestmentEvent, now: Timestamp) {
        self.events.push(event);
        self.updated_at = now;
    }

    /// When the lane was created.
    #[must_use]
    pub const fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// When the lane last changed.
    #[must_use]
    pub const fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn now() -> Timestamp {
        Timestamp::parse("2026-01-19T12:00:00Z").unwrap()
    }

    fn dec6() -> Decimals {
        Decimals::new(6).unwrap()
    }

    fn lane() -> InvestmentLane {
        InvestmentLane::new(
            ShareClassId::new("pool-1-sc-0"),
            AssetId::new("usdc"),
            now(),
        )
    }

    fn alice() -> InvestorId {
        InvestorId::new("alice")
    }

    #[test]
    fn fresh_lane_counters_at_one() {
        let lane = lane();
        assert_eq!(lane.counters().deposit.current(), EpochId::new(1));
        assert_eq!(lane.counters().issue.current(), EpochId::new(1));
        assert_eq!(lane.counters().redeem.current(), EpochId::new(1));
        assert_eq!(lane.counters().revoke.current(), EpochId::new(1));
        assert!(lane.pending_deposits().is_zero());
    }

    #[test]
    fn deposit_lifecycle_full_approval() {
        let mut lane = lane();
        lane.request_deposit(&alice(), AssetAmount::new(100), now())
            .unwrap();

        let remainder = lane
            .approve_deposits(
                EpochId::new(1),
                AssetAmount::new(100),
                Price::ONE,
                dec6(),
                dec6(),
                now(),
            )
            .unwrap();
        assert!(remainder.is_zero());
        assert_eq!(lane.counters().deposit.current(), EpochId::new(2));

        // NAV 1.1: 100 pool atoms buy floor(100 / 1.1) = 90 share atoms
        let issuance = lane
            .issue_shares(EpochId::new(1), Price::new(dec!(1.1)), now())
            .unwrap();
        assert_eq!(issuance.issued_shares, ShareAmount::new(90));

        let claim = lane.claim_deposit(&alice(), now()).unwrap();
        assert_eq!(claim.payout_shares, ShareAmount::new(90));
        assert_eq!(claim.payment_assets, AssetAmount::new(100));
        assert!(claim.cancelled_assets.is_zero());
        assert!(!claim.can_claim_again);
    }

    #[test]
    fn approval_out_of_sequence_rejected() {
        let mut lane = lane();
        lane.request_deposit(&alice(), AssetAmount::new(100), now())
            .unwrap();
        let err = lane
            .approve_deposits(
                EpochId::new(2),
                AssetAmount::new(100),
                Price::ONE,
                dec6(),
                dec6(),
                now(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            InvestmentError::EpochNotInSequence {
                got: 2,
                expected: 1
            }
        );
    }

    #[test]
    fn approval_with_nonpositive_price_rejected() {
        let mut lane = lane();
        lane.request_deposit(&alice(), AssetAmount::new(100), now())
            .unwrap();
        let err = lane
            .approve_deposits(
                EpochId::new(1),
                AssetAmount::new(100),
                Price::ZERO,
                dec6(),
                dec6(),
                now(),
            )
            .unwrap_err();
        assert!(matches!(err, InvestmentError::InvalidInput { .. }));
    }

    #[test]
    fn issue_unapproved_epoch_not_found() {
        let mut lane = lane();
        let err = lane
            .issue_shares(EpochId::new(1), Price::ONE, now())
            .unwrap_err();
        assert_eq!(err, InvestmentError::EpochNotFound { epoch: 1 });
    }

    #[test]
    fn issue_must_follow_approval_order() {
        let mut lane = lane();
        lane.request_deposit(&alice(), AssetAmount::new(100), now())
            .unwrap();
        lane.approve_deposits(
            EpochId::new(1),
            AssetAmount::new(50),
            Price::ONE,
            dec6(),
            dec6(),
            now(),
        )
        .unwrap();
        lane.approve_deposits(
            EpochId::new(2),
            AssetAmount::new(50),
            Price::ONE,
            dec6(),
            dec6(),
            now(),
        )
        .unwrap();

        let err = lane
            .issue_shares(EpochId::new(2), Price::ONE, now())
            .unwrap_err();
        assert_eq!(
            err,
            InvestmentError::EpochNotInSequence {
                got: 2,
                expected: 1
            }
        );
        lane.issue_shares(EpochId::new(1), Price::ONE, now()).unwrap();
        lane.issue_shares(EpochId::new(2), Price::ONE, now()).unwrap();
    }

    #[test]
    fn claim_before_issuance_is_blocked() {
        let mut lane = lane();
        lane.request_deposit(&alice(), AssetAmount::new(100), now())
            .unwrap();
        lane.approve_deposits(
            EpochId::new(1),
            AssetAmount::new(100),
            Price::ONE,
            dec6(),
            dec6(),
            now(),
        )
        .unwrap();

        let err = lane.claim_deposit(&alice(), now()).unwrap_err();
        assert_eq!(err, InvestmentError::IssuanceRequired);
    }

    #[test]
    fn multi_epoch_claims_in_order() {
        let mut lane = lane();
        lane.request_deposit(&alice(), AssetAmount::new(100), now())
            .unwrap();
        lane.approve_deposits(
            EpochId::new(1),
            AssetAmount::new(40),
            Price::ONE,
            dec6(),
            dec6(),
            now(),
        )
        .unwrap();
        lane.approve_deposits(
            EpochId::new(2),
            AssetAmount::new(60),
            Price::ONE,
            dec6(),
            dec6(),
            now(),
        )
        .unwrap();
        lane.issue_shares(EpochId::new(1), Price::ONE, now()).unwrap();
        lane.issue_shares(EpochId::new(2), Price::ONE, now()).unwrap();

        assert_eq!(lane.max_deposit_claims(&alice()), 2);

        let first = lane.claim_deposit(&alice(), now()).unwrap();
        assert_eq!(first.payout_shares, ShareAmount::new(40));
        assert!(first.can_claim_again);

        let second = lane.claim_deposit(&alice(), now()).unwrap();
        assert_eq!(second.payout_shares, ShareAmount::new(60));
        assert!(!second.can_claim_again);
        assert_eq!(lane.max_deposit_claims(&alice()), 0);
    }

    #[test]
    fn redeem_lifecycle_with_payout_conversion() {
        let mut lane = lane();
        lane.request_redeem(&alice(), ShareAmount::new(50), now())
            .unwrap();

        // price 2: each pool unit is half an asset unit
        lane.approve_redeems(EpochId::new(1), ShareAmount::new(50), Price::from_i64(2), now())
            .unwrap();

        let revocation = lane
            .revoke_shares(
                EpochId::new(1),
                Price::ONE,
                dec6(),
                dec6(),
                ShareAmount::new(1_000),
                now(),
            )
            .unwrap();
        assert_eq!(revocation.payout_pool, PoolAmount::new(50));
        assert_eq!(revocation.payout_asset, AssetAmount::new(25));

        let claim = lane.claim_redeem(&alice(), now()).unwrap();
        assert_eq!(claim.payout_assets, AssetAmount::new(25));
        assert_eq!(claim.payment_shares, ShareAmount::new(50));
    }

    #[test]
    fn revoke_more_than_issued_rejected() {
        let mut lane = lane();
        lane.request_redeem(&alice(), ShareAmount::new(50), now())
            .unwrap();
        lane.approve_redeems(EpochId::new(1), ShareAmount::new(50), Price::ONE, now())
            .unwrap();

        let err = lane
            .revoke_shares(
                EpochId::new(1),
                Price::ONE,
                dec6(),
                dec6(),
                ShareAmount::new(49),
                now(),
            )
            .unwrap_err();
        assert!(matches!(err, InvestmentError::RevokeMoreThanIssued { .. }));
        // nothing advanced, retry with enough issuance succeeds
        lane.revoke_shares(
            EpochId::new(1),
            Price::ONE,
            dec6(),
            dec6(),
            ShareAmount::new(50),
            now(),
        )
        .unwrap();
    }

    #[test]
    fn deposit_and_redeem_lanes_are_independent() {
        let mut lane = lane();
        lane.request_deposit(&alice(), AssetAmount::new(100), now())
            .unwrap();
        lane.approve_deposits(
            EpochId::new(1),
            AssetAmount::new(100),
            Price::ONE,
            dec6(),
            dec6(),
            now(),
        )
        .unwrap();

        assert_eq!(lane.counters().deposit.current(), EpochId::new(2));
        assert_eq!(lane.counters().redeem.current(), EpochId::new(1));
    }

    #[test]
    fn queued_cancellation_round_trip() {
        let mut lane = lane();
        lane.request_deposit(&alice(), AssetAmount::new(100), now())
            .unwrap();
        lane.approve_deposits(
            EpochId::new(1),
            AssetAmount::new(60),
            Price::ONE,
            dec6(),
            dec6(),
            now(),
        )
        .unwrap();

        let returned = lane.cancel_deposit(&alice(), now()).unwrap();
        assert!(returned.is_zero());
        assert_eq!(lane.deposit_state(&alice()), OrderState::QueuedCancellation);

        lane.issue_shares(EpochId::new(1), Price::ONE, now()).unwrap();
        let claim = lane.claim_deposit(&alice(), now()).unwrap();
        assert_eq!(claim.payout_shares, ShareAmount::new(60));
        assert_eq!(claim.cancelled_assets, AssetAmount::new(40));
        assert_eq!(lane.deposit_state(&alice()), OrderState::Idle);
        assert!(lane.pending_deposits().is_zero());
    }

    #[test]
    fn events_carry_order_post_state() {
        let mut lane = lane();
        lane.request_deposit(&alice(), AssetAmount::new(100), now())
            .unwrap();
        lane.approve_deposits(
            EpochId::new(1),
            AssetAmount::new(60),
            Price::ONE,
            dec6(),
            dec6(),
            now(),
        )
        .unwrap();
        // top-up and cancel while stuck, then settle through the claim
        lane.request_deposit(&alice(), AssetAmount::new(50), now())
            .unwrap();
        lane.cancel_deposit(&alice(), now()).unwrap();
        lane.issue_shares(EpochId::new(1), Price::ONE, now()).unwrap();
        lane.claim_deposit(&alice(), now()).unwrap();

        let events = lane.drain_events();
        assert_eq!(events.len(), 6);

        let InvestmentEvent::DepositRequested {
            queued,
            old_pending,
            new_pending,
            queued_amount,
            ..
        } = &events[0]
        else {
            panic!("expected deposit request event");
        };
        assert!(!*queued);
        assert_eq!(*old_pending, AssetAmount::ZERO);
        assert_eq!(*new_pending, AssetAmount::new(100));
        assert!(queued_amount.is_zero());

        let InvestmentEvent::DepositRequested {
            queued,
            old_pending,
            new_pending,
            queued_amount,
            ..
        } = &events[2]
        else {
            panic!("expected queued deposit request event");
        };
        assert!(*queued);
        assert_eq!(*old_pending, AssetAmount::new(100));
        assert_eq!(*new_pending, AssetAmount::new(100));
        assert_eq!(*queued_amount, AssetAmount::new(50));

        let InvestmentEvent::DepositCancelled {
            returned,
            epoch_id,
            queued,
            old_pending,
            new_pending,
            queued_amount,
            ..
        } = &events[3]
        else {
            panic!("expected queued cancellation event");
        };
        assert!(*queued);
        assert!(returned.is_zero());
        assert_eq!(*epoch_id, EpochId::new(2));
        assert_eq!(*old_pending, AssetAmount::new(100));
        assert_eq!(*new_pending, AssetAmount::new(100));
        assert_eq!(*queued_amount, AssetAmount::new(50));

        let InvestmentEvent::DepositClaimed {
            payment_assets,
            cancelled_assets,
            old_pending,
            new_pending,
            ..
        } = &events[5]
        else {
            panic!("expected deposit claim event");
        };
        assert_eq!(*payment_assets, AssetAmount::new(60));
        // unapproved remainder 40 plus the 50 carried by the cancellation
        assert_eq!(*cancelled_assets, AssetAmount::new(90));
        assert_eq!(*old_pending, AssetAmount::new(100));
        assert!(new_pending.is_zero());
    }

    #[test]
    fn events_are_recorded_and_drained() {
        let mut lane = lane();
        lane.request_deposit(&alice(), AssetAmount::new(100), now())
            .unwrap();
        assert_eq!(lane.pending_events().len(), 1);

        let events = lane.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "DEPOSIT_REQUESTED");
        assert!(lane.pending_events().is_empty());
    }
}
