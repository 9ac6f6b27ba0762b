//! Approve Epochs Use Case
//!
//! Manager-side approval of pending deposit and redemption aggregates,
//! fixing the asset/pool price for the epoch and advancing the request
//! counter. No custody moves at approval, so there is no journal scope here.

use std::sync::Arc;

use super::ApplicationError;
use crate::application::ports::{AssetRegistryPort, EventPublisherPort};
use crate::domain::investment::aggregate::InvestmentLane;
use crate::domain::investment::errors::InvestmentError;
use crate::domain::investment::repository::LaneRepository;
use crate::domain::investment::value_objects::EpochId;
use crate::domain::share_class::aggregate::ShareClass;
use crate::domain::share_class::repository::ShareClassRepository;
use crate::domain::shared::{
    AssetAmount, AssetId, AtomAmount, Price, ShareAmount, ShareClassId, Timestamp,
};

/// Use case for approving epochs.
pub struct ApproveEpochsUseCase<L, S, R, E>
where
    L: LaneRepository,
    S: ShareClassRepository,
    R: AssetRegistryPort,
    E: EventPublisherPort,
{
    lanes: Arc<L>,
    share_classes: Arc<S>,
    registry: Arc<R>,
    event_publisher: Arc<E>,
}

impl<L, S, R, E> ApproveEpochsUseCase<L, S, R, E>
where
    L: LaneRepository,
    S: ShareClassRepository,
    R: AssetRegistryPort,
    E: EventPublisherPort,
{
    /// Create a new `ApproveEpochsUseCase`.
    pub const fn new(
        lanes: Arc<L>,
        share_classes: Arc<S>,
        registry: Arc<R>,
        event_publisher: Arc<E>,
    ) -> Self {
        Self {
            lanes,
            share_classes,
            registry,
            event_publisher,
        }
    }

    /// Approve part of a lane's pending deposits for `epoch` at `price`.
    /// Returns the asset atoms left pending.
    pub async fn approve_deposits(
        &self,
        share_class_id: &ShareClassId,
        asset_id: &AssetId,
        epoch: EpochId,
        approved: AssetAmount,
        price: Price,
    ) -> Result<AssetAmount, ApplicationError> {
        let share_class = self.load_share_class(share_class_id).await?;
        let asset_dec = self.registry.asset_decimals(asset_id).await?;
        let pool_dec = self.registry.pool_decimals(share_class.pool()).await?;
        let mut lane = self
            .load_lane(share_class_id, asset_id, approved.atoms())
            .await?;

        let remainder = lane.approve_deposits(
            epoch,
            approved,
            price,
            asset_dec,
            pool_dec,
            Timestamp::now(),
        )?;
        self.lanes.save(&lane).await?;
        tracing::info!(
            share_class_id = %share_class_id,
            asset_id = %asset_id,
            epoch = %epoch,
            approved = %approved,
            remainder = %remainder,
            "deposit epoch approved"
        );

        self.publish(lane.drain_events()).await;
        Ok(remainder)
    }

    /// Approve part of a lane's pending redemptions for `epoch` at `price`.
    /// Returns the share atoms left pending.
    pub async fn approve_redeems(
        &self,
        share_class_id: &ShareClassId,
        asset_id: &AssetId,
        epoch: EpochId,
        approved: ShareAmount,
        price: Price,
    ) -> Result<ShareAmount, ApplicationError> {
        self.load_share_class(share_class_id).await?;
        let mut lane = self
            .load_lane(share_class_id, asset_id, approved.atoms())
            .await?;

        let remainder = lane.approve_redeems(epoch, approved, price, Timestamp::now())?;
        self.lanes.save(&lane).await?;
        tracing::info!(
            share_class_id = %share_class_id,
            asset_id = %asset_id,
            epoch = %epoch,
            approved = %approved,
            remainder = %remainder,
            "redeem epoch approved"
        );

        self.publish(lane.drain_events()).await;
        Ok(remainder)
    }

    async fn load_share_class(
        &self,
        share_class_id: &ShareClassId,
    ) -> Result<ShareClass, ApplicationError> {
        self.share_classes
            .find_by_id(share_class_id)
            .await?
            .ok_or_else(|| {
                InvestmentError::ShareClassNotFound {
                    id: share_class_id.to_string(),
                }
                .into()
            })
    }

    async fn load_lane(
        &self,
        share_class_id: &ShareClassId,
        asset_id: &AssetId,
        approved_atoms: u128,
    ) -> Result<InvestmentLane, ApplicationError> {
        self.lanes
            .find(share_class_id, asset_id)
            .await?
            .ok_or_else(|| {
                // no lane means nothing was ever requested
                InvestmentError::InsufficientPending {
                    approved: approved_atoms.to_string(),
                    pending: "0".to_string(),
                }
                .into()
            })
    }

    async fn publish(&self, events: Vec<crate::domain::investment::events::InvestmentEvent>) {
        if let Err(e) = self.event_publisher.publish_investment_events(events).await {
            tracing::error!("Failed to publish investment events: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{NoOpEventPublisher, NoOpJournal};
    use crate::application::use_cases::SubmitRequestsUseCase;
    use crate::domain::share_class::value_objects::{Salt, ShareClassMetadata};
    use crate::domain::shared::{InvestorId, PoolId};
    use crate::infrastructure::persistence::{InMemoryLaneRepository, InMemoryShareClassRepository};
    use crate::infrastructure::registry::InMemoryAssetRegistry;

    struct Fixture {
        approve: ApproveEpochsUseCase<
            InMemoryLaneRepository,
            InMemoryShareClassRepository,
            InMemoryAssetRegistry,
            NoOpEventPublisher,
        >,
        submit: SubmitRequestsUseCase<
            InMemoryLaneRepository,
            InMemoryShareClassRepository,
            NoOpJournal,
            NoOpEventPublisher,
        >,
        share_class_id: ShareClassId,
        asset: AssetId,
    }

    async fn fixture() -> Fixture {
        let lanes = Arc::new(InMemoryLaneRepository::new());
        let share_classes = Arc::new(InMemoryShareClassRepository::new());
        let registry = Arc::new(InMemoryAssetRegistry::new());
        let publisher = Arc::new(NoOpEventPublisher);

        let pool = PoolId::new("pool-1");
        let asset = AssetId::new("usdc");
        registry.register_asset(asset.clone(), 6);
        registry.register_pool(pool.clone(), 6);

        let share_class = crate::domain::share_class::aggregate::ShareClass::new(
            pool,
            1,
            ShareClassMetadata::new("Senior", "SNR").unwrap(),
            Salt::from_seed(1).unwrap(),
            Timestamp::now(),
        );
        let share_class_id = share_class.id().clone();
        share_classes.save(&share_class).await.unwrap();

        Fixture {
            approve: ApproveEpochsUseCase::new(
                Arc::clone(&lanes),
                Arc::clone(&share_classes),
                registry,
                Arc::clone(&publisher),
            ),
            submit: SubmitRequestsUseCase::new(
                lanes,
                share_classes,
                Arc::new(NoOpJournal),
                publisher,
            ),
            share_class_id,
            asset,
        }
    }

    #[tokio::test]
    async fn approve_deposits_returns_remainder() {
        let f = fixture().await;
        f.submit
            .request_deposit(
                &f.share_class_id,
                &f.asset,
                &InvestorId::new("alice"),
                AssetAmount::new(100),
            )
            .await
            .unwrap();

        let remainder = f
            .approve
            .approve_deposits(
                &f.share_class_id,
                &f.asset,
                EpochId::new(1),
                AssetAmount::new(60),
                Price::ONE,
            )
            .await
            .unwrap();
        assert_eq!(remainder, AssetAmount::new(40));
    }

    #[tokio::test]
    async fn approve_without_lane_fails() {
        let f = fixture().await;
        let err = f
            .approve
            .approve_deposits(
                &f.share_class_id,
                &f.asset,
                EpochId::new(1),
                AssetAmount::new(60),
                Price::ONE,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Investment(InvestmentError::InsufficientPending { .. })
        ));
    }

    #[tokio::test]
    async fn approve_unregistered_asset_fails() {
        let f = fixture().await;
        let unknown = AssetId::new("dai");
        f.submit
            .request_deposit(
                &f.share_class_id,
                &unknown,
                &InvestorId::new("alice"),
                AssetAmount::new(100),
            )
            .await
            .unwrap();

        let err = f
            .approve
            .approve_deposits(
                &f.share_class_id,
                &unknown,
                EpochId::new(1),
                AssetAmount::new(100),
                Price::ONE,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Registry(_)));
    }
}
