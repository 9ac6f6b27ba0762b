//! Per-epoch approval snapshots.
//!
//! Once an epoch is approved its snapshot is immutable apart from the single
//! processing stamp (issuance for deposits, revocation for redemptions).
//! Claims read these records; they never mutate them.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{AssetAmount, PoolAmount, Price, ShareAmount, Timestamp};

/// Snapshot of one approved deposit epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochInvestAmounts {
    /// Asset atoms pending in the lane at the moment of approval.
    pub pending_asset: AssetAmount,
    /// Asset atoms the manager approved for processing.
    pub approved_asset: AssetAmount,
    /// Approved amount converted to pool denomination at the approval price.
    pub approved_pool: PoolAmount,
    /// Asset/pool price fixed at approval.
    pub price: Price,
    /// NAV per share applied at issuance, if issued.
    pub nav: Option<Price>,
    /// Shares minted for this epoch, if issued.
    pub issued_shares: Option<ShareAmount>,
    /// When the epoch was issued.
    pub issued_at: Option<Timestamp>,
}

impl EpochInvestAmounts {
    /// Record a fresh approval snapshot, not yet issued.
    #[must_use]
    pub const fn approved(
        pending_asset: AssetAmount,
        approved_asset: AssetAmount,
        approved_pool: PoolAmount,
        price: Price,
    ) -> Self {
        Self {
            pending_asset,
            approved_asset,
            approved_pool,
            price,
            nav: None,
            issued_shares: None,
            issued_at: None,
        }
    }

    /// Stamp the issuance result onto the snapshot.
    pub fn stamp_issuance(&mut self, nav: Price, issued_shares: ShareAmount, at: Timestamp) {
        self.nav = Some(nav);
        self.issued_shares = Some(issued_shares);
        self.issued_at = Some(at);
    }

    /// Whether shares were issued for this epoch.
    #[must_use]
    pub const fn is_issued(&self) -> bool {
        self.issued_at.is_some()
    }
}

/// Snapshot of one approved redeem epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochRedeemAmounts {
    /// Share atoms pending in the lane at the moment of approval.
    pub pending_shares: ShareAmount,
    /// Share atoms the manager approved for revocation.
    pub approved_shares: ShareAmount,
    /// Asset/pool price fixed at approval; converts the payout back to asset.
    pub price: Price,
    /// NAV per share applied at revocation, if revoked.
    pub nav: Option<Price>,
    /// Pool-denominated payout for the revoked shares.
    pub payout_pool: Option<PoolAmount>,
    /// Asset-denominated payout owed to claimants.
    pub payout_asset: Option<AssetAmount>,
    /// When the epoch was revoked.
    pub revoked_at: Option<Timestamp>,
}

impl EpochRedeemAmounts {
    /// Record a fresh approval snapshot, not yet revoked.
    #[must_use]
    pub const fn approved(
        pending_shares: ShareAmount,
        approved_shares: ShareAmount,
        price: Price,
    ) -> Self {
        Self {
            pending_shares,
            approved_shares,
            price,
            nav: None,
            payout_pool: None,
            payout_asset: None,
            revoked_at: None,
        }
    }

    /// Stamp the revocation result onto the snapshot.
    pub fn stamp_revocation(
        &mut self,
        nav: Price,
        payout_pool: PoolAmount,
        payout_asset: AssetAmount,
        at: Timestamp,
    ) {
        self.nav = Some(nav);
        self.payout_pool = Some(payout_pool);
        self.payout_asset = Some(payout_asset);
        self.revoked_at = Some(at);
    }

    /// Whether shares were revoked for this epoch.
    #[must_use]
    pub const fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn invest_snapshot_starts_unissued() {
        let snapshot = EpochInvestAmounts::approved(
            AssetAmount::new(100),
            AssetAmount::new(60),
            PoolAmount::new(600),
            Price::new(dec!(10)),
        );
        assert!(!snapshot.is_issued());
        assert!(snapshot.nav.is_none());
    }

    #[test]
    fn issuance_stamp_is_recorded() {
        let mut snapshot = EpochInvestAmounts::approved(
            AssetAmount::new(100),
            AssetAmount::new(100),
            PoolAmount::new(100),
            Price::ONE,
        );
        snapshot.stamp_issuance(
            Price::new(dec!(1.1)),
            ShareAmount::new(90),
            Timestamp::parse("2026-01-19T12:00:00Z").unwrap(),
        );
        assert!(snapshot.is_issued());
        assert_eq!(snapshot.issued_shares, Some(ShareAmount::new(90)));
    }

    #[test]
    fn redeem_snapshot_starts_unrevoked() {
        let snapshot = EpochRedeemAmounts::approved(
            ShareAmount::new(50),
            ShareAmount::new(50),
            Price::ONE,
        );
        assert!(!snapshot.is_revoked());
        assert!(snapshot.payout_asset.is_none());
    }
}
