//! Queries Use Case
//!
//! Read-side views over share classes, lanes and investor positions. No
//! state changes and no events.

use std::sync::Arc;

use serde::Serialize;

use super::ApplicationError;
use crate::domain::investment::aggregate::InvestmentLane;
use crate::domain::investment::repository::LaneRepository;
use crate::domain::investment::value_objects::OrderState;
use crate::domain::share_class::errors::ShareClassError;
use crate::domain::share_class::repository::ShareClassRepository;
use crate::domain::shared::{
    AssetAmount, AssetId, AtomAmount, InvestorId, Price, ShareAmount, ShareClassId, Timestamp,
};

/// Directory view of one share class.
#[derive(Debug, Clone, Serialize)]
pub struct ShareClassView {
    /// Share class id.
    pub id: ShareClassId,
    /// Owning pool.
    pub pool: String,
    /// Per-pool sequential index.
    pub index: u32,
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Issued share total.
    pub total_issuance: ShareAmount,
    /// Last recorded NAV per share.
    pub nav_per_share: Price,
    /// Creation timestamp.
    pub created_at: Timestamp,
}

/// Epoch and aggregate state of one lane.
#[derive(Debug, Clone, Serialize)]
pub struct LaneView {
    /// Share class id.
    pub share_class_id: ShareClassId,
    /// Payment asset.
    pub asset_id: AssetId,
    /// Current deposit request epoch.
    pub deposit_epoch: u32,
    /// Current issuance epoch.
    pub issue_epoch: u32,
    /// Current redemption request epoch.
    pub redeem_epoch: u32,
    /// Current revocation epoch.
    pub revoke_epoch: u32,
    /// Unapproved pending deposit atoms.
    pub pending_deposits: AssetAmount,
    /// Unapproved pending redemption atoms.
    pub pending_redemptions: ShareAmount,
}

impl LaneView {
    fn from_lane(lane: &InvestmentLane) -> Self {
        Self {
            share_class_id: lane.share_class_id().clone(),
            asset_id: lane.asset_id().clone(),
            deposit_epoch: lane.counters().deposit.current().value(),
            issue_epoch: lane.counters().issue.current().value(),
            redeem_epoch: lane.counters().redeem.current().value(),
            revoke_epoch: lane.counters().revoke.current().value(),
            pending_deposits: lane.pending_deposits(),
            pending_redemptions: lane.pending_redemptions(),
        }
    }
}

/// One investor's position in one lane.
#[derive(Debug, Clone, Serialize)]
pub struct InvestorPositionView {
    /// Investor id.
    pub investor_id: InvestorId,
    /// Deposit-side order state.
    pub deposit_state: OrderState,
    /// Pending deposit atoms.
    pub deposit_pending: AssetAmount,
    /// Issued epochs still claimable on the deposit side.
    pub max_deposit_claims: u32,
    /// Redemption-side order state.
    pub redeem_state: OrderState,
    /// Pending redemption atoms.
    pub redeem_pending: ShareAmount,
    /// Revoked epochs still claimable on the redemption side.
    pub max_redeem_claims: u32,
}

/// Read-side use case.
pub struct QueriesUseCase<L, S>
where
    L: LaneRepository,
    S: ShareClassRepository,
{
    lanes: Arc<L>,
    share_classes: Arc<S>,
}

impl<L, S> QueriesUseCase<L, S>
where
    L: LaneRepository,
    S: ShareClassRepository,
{
    /// Create a new `QueriesUseCase`.
    pub const fn new(lanes: Arc<L>, share_classes: Arc<S>) -> Self {
        Self {
            lanes,
            share_classes,
        }
    }

    /// Directory view of a share class.
    pub async fn share_class(
        &self,
        id: &ShareClassId,
    ) -> Result<ShareClassView, ApplicationError> {
        let sc = self
            .share_classes
            .find_by_id(id)
            .await?
            .ok_or_else(|| ShareClassError::NotFound { id: id.to_string() })?;

        Ok(ShareClassView {
            id: sc.id().clone(),
            pool: sc.pool().to_string(),
            index: sc.index(),
            name: sc.metadata().name().to_string(),
            symbol: sc.metadata().symbol().to_string(),
            total_issuance: sc.metrics().total_issuance,
            nav_per_share: sc.metrics().nav_per_share,
            created_at: sc.created_at(),
        })
    }

    /// Lane state for a (share class, asset) pair, if the lane exists.
    pub async fn lane(
        &self,
        share_class_id: &ShareClassId,
        asset_id: &AssetId,
    ) -> Result<Option<LaneView>, ApplicationError> {
        let lane = self.lanes.find(share_class_id, asset_id).await?;
        Ok(lane.as_ref().map(LaneView::from_lane))
    }

    /// All lanes of a share class.
    pub async fn lanes(
        &self,
        share_class_id: &ShareClassId,
    ) -> Result<Vec<LaneView>, ApplicationError> {
        let lanes = self.lanes.find_by_share_class(share_class_id).await?;
        Ok(lanes.iter().map(LaneView::from_lane).collect())
    }

    /// An investor's position in a lane. An absent lane reads as a fully
    /// idle position.
    pub async fn investor_position(
        &self,
        share_class_id: &ShareClassId,
        asset_id: &AssetId,
        investor: &InvestorId,
    ) -> Result<InvestorPositionView, ApplicationError> {
        let lane = self.lanes.find(share_class_id, asset_id).await?;

        Ok(lane.map_or_else(
            || InvestorPositionView {
                investor_id: investor.clone(),
                deposit_state: OrderState::Idle,
                deposit_pending: AssetAmount::ZERO,
                max_deposit_claims: 0,
                redeem_state: OrderState::Idle,
                redeem_pending: ShareAmount::ZERO,
                max_redeem_claims: 0,
            },
            |lane| InvestorPositionView {
                investor_id: investor.clone(),
                deposit_state: lane.deposit_state(investor),
                deposit_pending: lane.deposit_pending(investor),
                max_deposit_claims: lane.max_deposit_claims(investor),
                redeem_state: lane.redeem_state(investor),
                redeem_pending: lane.redeem_pending(investor),
                max_redeem_claims: lane.max_redeem_claims(investor),
            },
        ))
    }
}
