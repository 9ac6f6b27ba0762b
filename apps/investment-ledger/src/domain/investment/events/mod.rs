//! Domain events emitted by investment lanes.

use serde::{Deserialize, Serialize};

use super::value_objects::EpochId;
use crate::domain::shared::{
    AssetAmount, AssetId, InvestorId, PoolAmount, Price, ShareAmount, ShareClassId, Timestamp,
};

/// Events recording every state transition of a lane's order flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvestmentEvent {
    /// A deposit request was merged into an order or queued behind one.
    ///
    /// Carries the full post-state of the investor's position so observers
    /// never have to re-query the lane.
    DepositRequested {
        /// Share class id.
        share_class_id: ShareClassId,
        /// Payment asset.
        asset_id: AssetId,
        /// Requesting investor.
        investor_id: InvestorId,
        /// Requested asset atoms.
        amount: AssetAmount,
        /// Request epoch at the time of the request.
        epoch_id: EpochId,
        /// Whether the request was queued behind a stuck order.
        queued: bool,
        /// Order's pending atoms before the request.
        old_pending: AssetAmount,
        /// Order's pending atoms after the request; unchanged when queued.
        new_pending: AssetAmount,
        /// Total atoms queued behind the order after the request.
        queued_amount: AssetAmount,
        /// When the event occurred.
        occurred_at: Timestamp,
    },

    /// A deposit request was cancelled or a cancellation queued.
    DepositCancelled {
        /// Share class id.
        share_class_id: ShareClassId,
        /// Payment asset.
        asset_id: AssetId,
        /// Cancelling investor.
        investor_id: InvestorId,
        /// Asset atoms returned immediately; zero when queued.
        returned: AssetAmount,
        /// Request epoch at the time of the cancellation.
        epoch_id: EpochId,
        /// Whether the cancellation was queued behind a stuck order.
        queued: bool,
        /// Order's pending atoms before the cancellation.
        old_pending: AssetAmount,
        /// Order's pending atoms after; unchanged when queued.
        new_pending: AssetAmount,
        /// Queued request atoms absorbed into the queued cancellation.
        queued_amount: AssetAmount,
        /// When the event occurred.
        occurred_at: Timestamp,
    },

    /// A redemption request was merged into an order or queued behind one.
    RedeemRequested {
        /// Share class id.
        share_class_id: ShareClassId,
        /// Payout asset.
        asset_id: AssetId,
        /// Requesting investor.
        investor_id: InvestorId,
        /// Requested share atoms.
        amount: ShareAmount,
        /// Request epoch at the time of the request.
        epoch_id: EpochId,
        /// Whether the request was queued behind a stuck order.
        queued: bool,
        /// Order's pending atoms before the request.
        old_pending: ShareAmount,
        /// Order's pending atoms after the request; unchanged when queued.
        new_pending: ShareAmount,
        /// Total atoms queued behind the order after the request.
        queued_amount: ShareAmount,
        /// When the event occurred.
        occurred_at: Timestamp,
    },

    /// A redemption request was cancelled or a cancellation queued.
    RedeemCancelled {
        /// Share class id.
        share_class_id: ShareClassId,
        /// Payout asset.
        asset_id: AssetId,
        /// Cancelling investor.
        investor_id: InvestorId,
        /// Share atoms returned immediately; zero when queued.
        returned: ShareAmount,
        /// Request epoch at the time of the cancellation.
        epoch_id: EpochId,
        /// Whether the cancellation was queued behind a stuck order.
        queued: bool,
        /// Order's pending atoms before the cancellation.
        old_pending: ShareAmount,
        /// Order's pending atoms after; unchanged when queued.
        new_pending: ShareAmount,
        /// Queued request atoms absorbed into the queued cancellation.
        queued_amount: ShareAmount,
        /// When the event occurred.
        occurred_at: Timestamp,
    },

    /// The manager approved part of the pending deposit aggregate.
    DepositsApproved {
        /// Share class id.
        share_class_id: ShareClassId,
        /// Payment asset.
        asset_id: AssetId,
        /// Approved epoch.
        epoch_id: EpochId,
        /// Approved asset atoms.
        approved_asset: AssetAmount,
        /// Approved amount in pool denomination.
        approved_pool: PoolAmount,
        /// Asset/pool price fixed for the epoch.
        price: Price,
        /// Asset atoms left pending after the approval.
        remainder: AssetAmount,
        /// When the event occurred.
        occurred_at: Timestamp,
    },

    /// The manager approved part of the pending redemption aggregate.
    RedeemsApproved {
        /// Share class id.
        share_class_id: ShareClassId,
        /// Payout asset.
        asset_id: AssetId,
        /// Approved epoch.
        epoch_id: EpochId,
        /// Approved share atoms.
        approved_shares: ShareAmount,
        /// Asset/pool price fixed for the epoch.
        price: Price,
        /// Share atoms left pending after the approval.
        remainder: ShareAmount,
        /// When the event occurred.
        occurred_at: Timestamp,
    },

    /// Shares were issued for an approved deposit epoch.
    SharesIssued {
        /// Share class id.
        share_class_id: ShareClassId,
        /// Payment asset.
        asset_id: AssetId,
        /// Issued epoch.
        epoch_id: EpochId,
        /// NAV per share applied.
        nav: Price,
        /// Shares minted for the epoch.
        issued_shares: ShareAmount,
        /// When the event occurred.
        occurred_at: Timestamp,
    },

    /// Shares were revoked for an approved redemption epoch.
    SharesRevoked {
        /// Share class id.
        share_class_id: ShareClassId,
        /// Payout asset.
        asset_id: AssetId,
        /// Revoked epoch.
        epoch_id: EpochId,
        /// NAV per share applied.
        nav: Price,
        /// Shares burned for the epoch.
        revoked_shares: ShareAmount,
        /// Pool-denominated payout.
        payout_pool: PoolAmount,
        /// Asset-denominated payout owed to claimants.
        payout_asset: AssetAmount,
        /// When the event occurred.
        occurred_at: Timestamp,
    },

    /// An investor claimed their slice of an issued deposit epoch.
    DepositClaimed {
        /// Share class id.
        share_class_id: ShareClassId,
        /// Payment asset.
        asset_id: AssetId,
        /// Claiming investor.
        investor_id: InvestorId,
        /// Epoch claimed through.
        epoch_id: EpochId,
        /// Shares delivered to the investor.
        payout_shares: ShareAmount,
        /// Asset atoms consumed from the investor's order.
        payment_assets: AssetAmount,
        /// Asset atoms returned by a flushed cancellation.
        cancelled_assets: AssetAmount,
        /// Order's pending atoms before the claim.
        old_pending: AssetAmount,
        /// Order's pending atoms after the claim and any queue flush.
        new_pending: AssetAmount,
        /// When the event occurred.
        occurred_at: Timestamp,
    },

    /// An investor claimed their slice of a revoked redemption epoch.
    RedeemClaimed {
        /// Share class id.
        share_class_id: ShareClassId,
        /// Payout asset.
        asset_id: AssetId,
        /// Claiming investor.
        investor_id: InvestorId,
        /// Epoch claimed through.
        epoch_id: EpochId,
        /// Asset atoms delivered to the investor.
        payout_assets: AssetAmount,
        /// Share atoms consumed from the investor's order.
        payment_shares: ShareAmount,
        /// Share atoms returned by a flushed cancellation.
        cancelled_shares: ShareAmount,
        /// Order's pending atoms before the claim.
        old_pending: ShareAmount,
        /// Order's pending atoms after the claim and any queue flush.
        new_pending: ShareAmount,
        /// When the event occurred.
        occurred_at: Timestamp,
    },
}

impl InvestmentEvent {
    /// Share class the event belongs to.
    #[must_use]
    pub const fn share_class_id(&self) -> &ShareClassId {
        match self {
            Self::DepositRequested { share_class_id, .. }
            | Self::DepositCancelled { share_class_id, .. }
            | Self::RedeemRequested { share_class_id, .. }
            | Self::RedeemCancelled { share_class_id, .. }
            | Self::DepositsApproved { share_class_id, .. }
            | Self::RedeemsApproved { share_class_id, .. }
            | Self::SharesIssued { share_class_id, .. }
            | Self::SharesRevoked { share_class_id, .. }
            | Self::DepositClaimed { share_class_id, .. }
            | Self::RedeemClaimed { share_class_id, .. } => share_class_id,
        }
    }

    /// When the event occurred.
    #[must_use]
    pub const fn occurred_at(&self) -> &Timestamp {
        match self {
            Self::DepositRequested { occurred_at, .. }
            | Self::DepositCancelled { occurred_at, .. }
            | Self::RedeemRequested { occurred_at, .. }
            | Self::RedeemCancelled { occurred_at, .. }
            | Self::DepositsApproved { occurred_at, .. }
            | Self::RedeemsApproved { occurred_at, .. }
            | Self::SharesIssued { occurred_at, .. }
            | Self::SharesRevoked { occurred_at, .. }
            | Self::DepositClaimed { occurred_at, .. }
            | Self::RedeemClaimed { occurred_at, .. } => occurred_at,
        }
    }

    /// Stable event type tag for logs and outboxes.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::DepositRequested { .. } => "DEPOSIT_REQUESTED",
            Self::DepositCancelled { .. } => "DEPOSIT_CANCELLED",
            Self::RedeemRequested { .. } => "REDEEM_REQUESTED",
            Self::RedeemCancelled { .. } => "REDEEM_CANCELLED",
            Self::DepositsApproved { .. } => "DEPOSITS_APPROVED",
            Self::RedeemsApproved { .. } => "REDEEMS_APPROVED",
            Self::SharesIssued { .. } => "SHARES_ISSUED",
            Self::SharesRevoked { .. } => "SHARES_REVOKED",
            Self::DepositClaimed { .. } => "DEPOSIT_CLAIMED",
            Self::RedeemClaimed { .. } => "REDEEM_CLAIMED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::AtomAmount;

    #[test]
    fn serializes_with_type_tag() {
        let event = InvestmentEvent::SharesIssued {
            share_class_id: ShareClassId::new("pool-1-sc-0"),
            asset_id: AssetId::new("usdc"),
            epoch_id: EpochId::new(1),
            nav: Price::ONE,
            issued_shares: ShareAmount::new(100),
            occurred_at: Timestamp::parse("2026-01-19T12:00:00Z").unwrap(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"SHARES_ISSUED\""));
        assert_eq!(event.event_type(), "SHARES_ISSUED");
    }

    #[test]
    fn accessors_cover_claim_events() {
        let event = InvestmentEvent::DepositClaimed {
            share_class_id: ShareClassId::new("pool-1-sc-0"),
            asset_id: AssetId::new("usdc"),
            investor_id: InvestorId::new("alice"),
            epoch_id: EpochId::new(3),
            payout_shares: ShareAmount::new(90),
            payment_assets: AssetAmount::new(100),
            cancelled_assets: AssetAmount::ZERO,
            old_pending: AssetAmount::new(100),
            new_pending: AssetAmount::ZERO,
            occurred_at: Timestamp::parse("2026-01-19T12:00:00Z").unwrap(),
        };
        assert_eq!(event.share_class_id().as_str(), "pool-1-sc-0");
        assert_eq!(event.event_type(), "DEPOSIT_CLAIMED");
    }
}
