//! Domain events for the share class directory.

use serde::{Deserialize, Serialize};

use crate::domain::share_class::value_objects::Salt;
use crate::domain::shared::{PoolId, Price, ShareAmount, ShareClassId, Timestamp};

/// All share class directory events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShareClassEvent {
    /// A share class was added to the directory.
    Added(ShareClassAdded),
    /// Name/symbol were updated.
    MetadataUpdated(MetadataUpdated),
    /// Issuance increased outside the epoch flow or at issuance.
    IssuanceIncreased(IssuanceChanged),
    /// Issuance decreased outside the epoch flow or at revocation.
    IssuanceDecreased(IssuanceChanged),
    /// A new NAV per share was recorded.
    SharePriceUpdated(SharePriceUpdated),
}

impl ShareClassEvent {
    /// Get the share class id for this event.
    #[must_use]
    pub fn share_class_id(&self) -> &ShareClassId {
        match self {
            Self::Added(e) => &e.id,
            Self::MetadataUpdated(e) => &e.id,
            Self::IssuanceIncreased(e) | Self::IssuanceDecreased(e) => &e.id,
            Self::SharePriceUpdated(e) => &e.id,
        }
    }

    /// Get the timestamp when this event occurred.
    #[must_use]
    pub fn occurred_at(&self) -> Timestamp {
        match self {
            Self::Added(e) => e.occurred_at,
            Self::MetadataUpdated(e) => e.occurred_at,
            Self::IssuanceIncreased(e) | Self::IssuanceDecreased(e) => e.occurred_at,
            Self::SharePriceUpdated(e) => e.occurred_at,
        }
    }

    /// Get the event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Added(_) => "SHARE_CLASS_ADDED",
            Self::MetadataUpdated(_) => "SHARE_CLASS_METADATA_UPDATED",
            Self::IssuanceIncreased(_) => "SHARE_CLASS_ISSUANCE_INCREASED",
            Self::IssuanceDecreased(_) => "SHARE_CLASS_ISSUANCE_DECREASED",
            Self::SharePriceUpdated(_) => "SHARE_CLASS_PRICE_UPDATED",
        }
    }
}

/// Event: a share class was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareClassAdded {
    /// Owning pool.
    pub pool: PoolId,
    /// New share class id.
    pub id: ShareClassId,
    /// Per-pool sequential index used for derivation.
    pub index: u32,
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Creation salt.
    pub salt: Salt,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: metadata updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataUpdated {
    /// Share class id.
    pub id: ShareClassId,
    /// New token name.
    pub name: String,
    /// New token symbol.
    pub symbol: String,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: total issuance moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceChanged {
    /// Share class id.
    pub id: ShareClassId,
    /// Size of the change in share atoms.
    pub amount: ShareAmount,
    /// Total issuance after the change.
    pub total_issuance: ShareAmount,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: NAV per share recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePriceUpdated {
    /// Share class id.
    pub id: ShareClassId,
    /// New NAV in pool currency per share.
    pub nav_per_share: Price,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}
