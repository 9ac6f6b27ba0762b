//! Share Class Aggregate Root
//!
//! A share class is one tranche of a pool's fund shares with its own token
//! metadata and global issuance metrics. Epoch bookkeeping lives in the
//! investment context; this aggregate owns identity, metadata, and the
//! issued-share total that issuance and revocation move.

use serde::{Deserialize, Serialize};

use crate::domain::share_class::errors::ShareClassError;
use crate::domain::share_class::events::{
    IssuanceChanged, MetadataUpdated, ShareClassAdded, ShareClassEvent, SharePriceUpdated,
};
use crate::domain::share_class::value_objects::{Salt, ShareClassMetadata, ShareClassMetrics};
use crate::domain::shared::{AtomAmount, PoolId, Price, ShareAmount, ShareClassId, Timestamp};

/// Share Class Aggregate Root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareClass {
    id: ShareClassId,
    pool: PoolId,
    index: u32,
    metadata: ShareClassMetadata,
    salt: Salt,
    metrics: ShareClassMetrics,
    #[serde(skip)]
    events: Vec<ShareClassEvent>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl ShareClass {
    /// Create a new share class as the `index`-th class of `pool` (1-based).
    ///
    /// The id is derived deterministically from the pool and index. Salt
    /// uniqueness across the directory is the repository's concern; the
    /// caller must have checked it already.
    #[must_use]
    pub fn new(
        pool: PoolId,
        index: u32,
        metadata: ShareClassMetadata,
        salt: Salt,
        now: Timestamp,
    ) -> Self {
        let id = ShareClassId::derive(&pool, index);

        let mut share_class = Self {
            id: id.clone(),
            pool: pool.clone(),
            index,
            metadata: metadata.clone(),
            salt,
            metrics: ShareClassMetrics::default(),
            events: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        share_class.events.push(ShareClassEvent::Added(ShareClassAdded {
            pool,
            id,
            index,
            name: metadata.name().to_string(),
            symbol: metadata.symbol().to_string(),
            salt,
            occurred_at: now,
        }));

        share_class
    }

    /// The derived share class id.
    #[must_use]
    pub const fn id(&self) -> &ShareClassId {
        &self.id
    }

    /// The owning pool.
    #[must_use]
    pub const fn pool(&self) -> &PoolId {
        &self.pool
    }

    /// The per-pool sequential index.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Current token metadata.
    #[must_use]
    pub const fn metadata(&self) -> &ShareClassMetadata {
        &self.metadata
    }

    /// The creation salt.
    #[must_use]
    pub const fn salt(&self) -> Salt {
        self.salt
    }

    /// Current issuance metrics.
    #[must_use]
    pub const fn metrics(&self) -> ShareClassMetrics {
        self.metrics
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Replace name and symbol. Metadata stays mutable after creation.
    pub fn update_metadata(&mut self, metadata: ShareClassMetadata, now: Timestamp) {
        self.metadata = metadata.clone();
        self.updated_at = now;

        self.events
            .push(ShareClassEvent::MetadataUpdated(MetadataUpdated {
                id: self.id.clone(),
                name: metadata.name().to_string(),
                symbol: metadata.symbol().to_string(),
                occurred_at: now,
            }));
    }

    /// Increase total issuance (epoch issuance or explicit adjustment).
    ///
    /// # Errors
    ///
    /// Returns `IssuanceOverflow` if the total would exceed `u128`.
    pub fn increase_issuance(
        &mut self,
        amount: ShareAmount,
        now: Timestamp,
    ) -> Result<(), ShareClassError> {
        let total = self
            .metrics
            .total_issuance
            .checked_add(amount)
            .map_err(|_| ShareClassError::IssuanceOverflow {
                operation: "increase_issuance".to_string(),
            })?;

        self.metrics.total_issuance = total;
        self.updated_at = now;

        self.events
            .push(ShareClassEvent::IssuanceIncreased(IssuanceChanged {
                id: self.id.clone(),
                amount,
                total_issuance: total,
                occurred_at: now,
            }));

        Ok(())
    }

    /// Decrease total issuance (revocation or explicit adjustment).
    ///
    /// # Errors
    ///
    /// Returns `DecreaseMoreThanIssued` if `amount` exceeds the issued total;
    /// decreases are bounded by prior increases so issuance stays
    /// non-negative.
    pub fn decrease_issuance(
        &mut self,
        amount: ShareAmount,
        now: Timestamp,
    ) -> Result<(), ShareClassError> {
        let total = self
            .metrics
            .total_issuance
            .checked_sub(amount)
            .map_err(|_| ShareClassError::DecreaseMoreThanIssued {
                requested: amount.to_string(),
                issued: self.metrics.total_issuance.to_string(),
            })?;

        self.metrics.total_issuance = total;
        self.updated_at = now;

        self.events
            .push(ShareClassEvent::IssuanceDecreased(IssuanceChanged {
                id: self.id.clone(),
                amount,
                total_issuance: total,
                occurred_at: now,
            }));

        Ok(())
    }

    /// Record an externally supplied NAV per share.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSharePrice` if the NAV is not positive.
    pub fn update_share_price(
        &mut self,
        nav_per_share: Price,
        now: Timestamp,
    ) -> Result<(), ShareClassError> {
        nav_per_share
            .validate_positive()
            .map_err(|_| ShareClassError::InvalidSharePrice)?;

        self.metrics.nav_per_share = nav_per_share;
        self.updated_at = now;

        self.events
            .push(ShareClassEvent::SharePriceUpdated(SharePriceUpdated {
                id: self.id.clone(),
                nav_per_share,
                occurred_at: now,
            }));

        Ok(())
    }

    /// Drain accumulated domain events.
    pub fn drain_events(&mut self) -> Vec<ShareClassEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get pending events without draining.
    #[must_use]
    pub fn pending_events(&self) -> &[ShareClassEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_share_class() -> ShareClass {
        ShareClass::new(
            PoolId::new("pool-1"),
            1,
            ShareClassMetadata::new("Senior Tranche", "SNR").unwrap(),
            Salt::from_seed(1).unwrap(),
            Timestamp::now(),
        )
    }

    #[test]
    fn new_derives_id_and_emits_added() {
        let sc = make_share_class();

        assert_eq!(sc.id().as_str(), "pool-1-sc-1");
        assert_eq!(sc.index(), 1);
        assert!(sc.metrics().total_issuance.is_zero());
        assert_eq!(sc.pending_events().len(), 1);
        assert!(matches!(sc.pending_events()[0], ShareClassEvent::Added(_)));
    }

    #[test]
    fn update_metadata_replaces_and_emits() {
        let mut sc = make_share_class();
        sc.drain_events();

        let md = ShareClassMetadata::new("Junior Tranche", "JNR").unwrap();
        sc.update_metadata(md, Timestamp::now());

        assert_eq!(sc.metadata().name(), "Junior Tranche");
        assert_eq!(sc.metadata().symbol(), "JNR");
        assert!(matches!(
            sc.pending_events()[0],
            ShareClassEvent::MetadataUpdated(_)
        ));
    }

    #[test]
    fn increase_and_decrease_issuance() {
        let mut sc = make_share_class();
        sc.drain_events();

        sc.increase_issuance(ShareAmount::new(100), Timestamp::now())
            .unwrap();
        assert_eq!(sc.metrics().total_issuance, ShareAmount::new(100));

        sc.decrease_issuance(ShareAmount::new(40), Timestamp::now())
            .unwrap();
        assert_eq!(sc.metrics().total_issuance, ShareAmount::new(60));

        assert_eq!(sc.pending_events().len(), 2);
    }

    #[test]
    fn decrease_more_than_issued_fails() {
        let mut sc = make_share_class();
        sc.increase_issuance(ShareAmount::new(10), Timestamp::now())
            .unwrap();

        let result = sc.decrease_issuance(ShareAmount::new(11), Timestamp::now());
        assert!(matches!(
            result,
            Err(ShareClassError::DecreaseMoreThanIssued { .. })
        ));
        // State untouched on failure
        assert_eq!(sc.metrics().total_issuance, ShareAmount::new(10));
    }

    #[test]
    fn decrease_bounded_by_prior_increases_only() {
        let mut sc = make_share_class();
        let result = sc.decrease_issuance(ShareAmount::new(1), Timestamp::now());
        assert!(result.is_err());
    }

    #[test]
    fn update_share_price() {
        let mut sc = make_share_class();
        sc.drain_events();

        sc.update_share_price(Price::from_i64(2), Timestamp::now())
            .unwrap();
        assert_eq!(sc.metrics().nav_per_share, Price::from_i64(2));
        assert!(matches!(
            sc.pending_events()[0],
            ShareClassEvent::SharePriceUpdated(_)
        ));
    }

    #[test]
    fn update_share_price_rejects_zero() {
        let mut sc = make_share_class();
        assert!(matches!(
            sc.update_share_price(Price::ZERO, Timestamp::now()),
            Err(ShareClassError::InvalidSharePrice)
        ));
    }

    #[test]
    fn drain_events_empties_buffer() {
        let mut sc = make_share_class();
        let events = sc.drain_events();
        assert_eq!(events.len(), 1);
        assert!(sc.pending_events().is_empty());
    }

    #[test]
    fn serde_roundtrip_skips_events() {
        let sc = make_share_class();
        let json = serde_json::to_string(&sc).unwrap();
        let parsed: ShareClass = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id(), sc.id());
        assert_eq!(parsed.metadata(), sc.metadata());
        assert!(parsed.pending_events().is_empty());
    }
}
