//! Lane Repository Trait
//!
//! Persistence abstraction for investment lanes, keyed by
//! (share class, asset).

use async_trait::async_trait;

use super::aggregate::InvestmentLane;
use super::errors::InvestmentError;
use crate::domain::shared::{AssetId, ShareClassId};

/// Repository trait for investment lane persistence.
#[async_trait]
pub trait LaneRepository: Send + Sync {
    /// Save a lane (insert or update).
    async fn save(&self, lane: &InvestmentLane) -> Result<(), InvestmentError>;

    /// Find the lane for a (share class, asset) pair.
    async fn find(
        &self,
        share_class: &ShareClassId,
        asset: &AssetId,
    ) -> Result<Option<InvestmentLane>, InvestmentError>;

    /// All lanes of a share class.
    async fn find_by_share_class(
        &self,
        share_class: &ShareClassId,
    ) -> Result<Vec<InvestmentLane>, InvestmentError>;
}
