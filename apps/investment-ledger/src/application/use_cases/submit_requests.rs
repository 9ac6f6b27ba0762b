//! Submit Requests Use Case
//!
//! Investor-facing entry points: deposit and redemption requests and their
//! cancellations. Lanes are created lazily on the first request for a
//! (share class, asset) pair.

use std::sync::Arc;

use super::ApplicationError;
use crate::application::ports::{AccountingJournalPort, EventPublisherPort, JournalEntry};
use crate::domain::investment::aggregate::InvestmentLane;
use crate::domain::investment::errors::InvestmentError;
use crate::domain::investment::repository::LaneRepository;
use crate::domain::share_class::repository::ShareClassRepository;
use crate::domain::shared::{
    AssetAmount, AssetId, AtomAmount, InvestorId, ShareAmount, ShareClassId, Timestamp,
};

pub(super) fn investor_asset_account(investor: &InvestorId, asset: &AssetId) -> String {
    format!("investor:{investor}:asset:{asset}")
}

pub(super) fn investor_share_account(investor: &InvestorId, share_class: &ShareClassId) -> String {
    format!("investor:{investor}:shares:{share_class}")
}

pub(super) fn lane_asset_escrow(share_class: &ShareClassId, asset: &AssetId) -> String {
    format!("lane:{share_class}:{asset}:asset-escrow")
}

pub(super) fn lane_share_escrow(share_class: &ShareClassId, asset: &AssetId) -> String {
    format!("lane:{share_class}:{asset}:share-escrow")
}

/// Use case for submitting and cancelling requests.
pub struct SubmitRequestsUseCase<L, S, J, E>
where
    L: LaneRepository,
    S: ShareClassRepository,
    J: AccountingJournalPort,
    E: EventPublisherPort,
{
    lanes: Arc<L>,
    share_classes: Arc<S>,
    journal: Arc<J>,
    event_publisher: Arc<E>,
}

impl<L, S, J, E> SubmitRequestsUseCase<L, S, J, E>
where
    L: LaneRepository,
    S: ShareClassRepository,
    J: AccountingJournalPort,
    E: EventPublisherPort,
{
    /// Create a new `SubmitRequestsUseCase`.
    pub const fn new(
        lanes: Arc<L>,
        share_classes: Arc<S>,
        journal: Arc<J>,
        event_publisher: Arc<E>,
    ) -> Self {
        Self {
            lanes,
            share_classes,
            journal,
            event_publisher,
        }
    }

    /// Place or enlarge a deposit request. The asset moves into lane escrow
    /// immediately, whether the request merged or was queued.
    ///
    /// Returns true when the request was queued behind a stuck order.
    pub async fn request_deposit(
        &self,
        share_class_id: &ShareClassId,
        asset_id: &AssetId,
        investor: &InvestorId,
        amount: AssetAmount,
    ) -> Result<bool, ApplicationError> {
        let mut lane = self.load_or_create_lane(share_class_id, asset_id).await?;

        let scope = self.journal.open("deposit request").await?;
        self.journal
            .post(
                scope,
                JournalEntry::debit(investor_asset_account(investor, asset_id), amount.atoms()),
            )
            .await?;
        self.journal
            .post(
                scope,
                JournalEntry::credit(lane_asset_escrow(share_class_id, asset_id), amount.atoms()),
            )
            .await?;

        let queued = lane.request_deposit(investor, amount, Timestamp::now())?;
        self.lanes.save(&lane).await?;
        self.journal.close(scope).await?;

        self.publish(lane.drain_events()).await;
        Ok(queued)
    }

    /// Cancel a deposit request. Returns the atoms refunded immediately;
    /// zero when the cancellation was queued behind a stuck order.
    pub async fn cancel_deposit(
        &self,
        share_class_id: &ShareClassId,
        asset_id: &AssetId,
        investor: &InvestorId,
    ) -> Result<AssetAmount, ApplicationError> {
        let mut lane = self.load_lane(share_class_id, asset_id, investor).await?;

        let scope = self.journal.open("deposit cancellation").await?;
        let returned = lane.cancel_deposit(investor, Timestamp::now())?;
        if !returned.is_zero() {
            self.journal
                .post(
                    scope,
                    JournalEntry::debit(
                        lane_asset_escrow(share_class_id, asset_id),
                        returned.atoms(),
                    ),
                )
                .await?;
            self.journal
                .post(
                    scope,
                    JournalEntry::credit(
                        investor_asset_account(investor, asset_id),
                        returned.atoms(),
                    ),
                )
                .await?;
        }
        self.lanes.save(&lane).await?;
        self.journal.close(scope).await?;

        self.publish(lane.drain_events()).await;
        Ok(returned)
    }

    /// Place or enlarge a redemption request. The shares move into lane
    /// escrow immediately, whether the request merged or was queued.
    ///
    /// Returns true when the request was queued behind a stuck order.
    pub async fn request_redeem(
        &self,
        share_class_id: &ShareClassId,
        asset_id: &AssetId,
        investor: &InvestorId,
        amount: ShareAmount,
    ) -> Result<bool, ApplicationError> {
        let mut lane = self.load_or_create_lane(share_class_id, asset_id).await?;

        let scope = self.journal.open("redeem request").await?;
        self.journal
            .post(
                scope,
                JournalEntry::debit(
                    investor_share_account(investor, share_class_id),
                    amount.atoms(),
                ),
            )
            .await?;
        self.journal
            .post(
                scope,
                JournalEntry::credit(lane_share_escrow(share_class_id, asset_id), amount.atoms()),
            )
            .await?;

        let queued = lane.request_redeem(investor, amount, Timestamp::now())?;
        self.lanes.save(&lane).await?;
        self.journal.close(scope).await?;

        self.publish(lane.drain_events()).await;
        Ok(queued)
    }

    /// Cancel a redemption request. Returns the share atoms refunded
    /// immediately; zero when the cancellation was queued.
    pub async fn cancel_redeem(
        &self,
        share_class_id: &ShareClassId,
        asset_id: &AssetId,
        investor: &InvestorId,
    ) -> Result<ShareAmount, ApplicationError> {
        let mut lane = self.load_lane(share_class_id, asset_id, investor).await?;

        let scope = self.journal.open("redeem cancellation").await?;
        let returned = lane.cancel_redeem(investor, Timestamp::now())?;
        if !returned.is_zero() {
            self.journal
                .post(
                    scope,
                    JournalEntry::debit(
                        lane_share_escrow(share_class_id, asset_id),
                        returned.atoms(),
                    ),
                )
                .await?;
            self.journal
                .post(
                    scope,
                    JournalEntry::credit(
                        investor_share_account(investor, share_class_id),
                        returned.atoms(),
                    ),
                )
                .await?;
        }
        self.lanes.save(&lane).await?;
        self.journal.close(scope).await?;

        self.publish(lane.drain_events()).await;
        Ok(returned)
    }

    async fn load_or_create_lane(
        &self,
        share_class_id: &ShareClassId,
        asset_id: &AssetId,
    ) -> Result<InvestmentLane, ApplicationError> {
        self.ensure_share_class(share_class_id).await?;
        let lane = self.lanes.find(share_class_id, asset_id).await?;
        Ok(lane.unwrap_or_else(|| {
            InvestmentLane::new(share_class_id.clone(), asset_id.clone(), Timestamp::now())
        }))
    }

    async fn load_lane(
        &self,
        share_class_id: &ShareClassId,
        asset_id: &AssetId,
        investor: &InvestorId,
    ) -> Result<InvestmentLane, ApplicationError> {
        self.ensure_share_class(share_class_id).await?;
        self.lanes
            .find(share_class_id, asset_id)
            .await?
            .ok_or_else(|| {
                InvestmentError::NoOrderFound {
                    investor: investor.to_string(),
                }
                .into()
            })
    }

    async fn ensure_share_class(
        &self,
        share_class_id: &ShareClassId,
    ) -> Result<(), ApplicationError> {
        if self.share_classes.exists(share_class_id).await? {
            Ok(())
        } else {
            Err(InvestmentError::ShareClassNotFound {
                id: share_class_id.to_string(),
            }
            .into())
        }
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
    use crate::domain::share_class::value_objects::Salt;
    use crate::domain::shared::PoolId;
    use crate::infrastructure::persistence::{InMemoryLaneRepository, InMemoryShareClassRepository};

    struct Fixture {
        uc: SubmitRequestsUseCase<
            InMemoryLaneRepository,
            InMemoryShareClassRepository,
            NoOpJournal,
            NoOpEventPublisher,
        >,
        share_class_id: ShareClassId,
    }

    async fn fixture() -> Fixture {
        let share_classes = Arc::new(InMemoryShareClassRepository::new());
        let share_class = crate::domain::share_class::aggregate::ShareClass::new(
            PoolId::new("pool-1"),
            1,
            crate::domain::share_class::value_objects::ShareClassMetadata::new("Senior", "SNR")
                .unwrap(),
            Salt::from_seed(1).unwrap(),
            Timestamp::now(),
        );
        let share_class_id = share_class.id().clone();
        share_classes.save(&share_class).await.unwrap();

        Fixture {
            uc: SubmitRequestsUseCase::new(
                Arc::new(InMemoryLaneRepository::new()),
                share_classes,
                Arc::new(NoOpJournal),
                Arc::new(NoOpEventPublisher),
            ),
            share_class_id,
        }
    }

    #[tokio::test]
    async fn request_deposit_creates_lane() {
        let f = fixture().await;
        let queued = f
            .uc
            .request_deposit(
                &f.share_class_id,
                &AssetId::new("usdc"),
                &InvestorId::new("alice"),
                AssetAmount::new(100),
            )
            .await
            .unwrap();
        assert!(!queued);
    }

    #[tokio::test]
    async fn request_for_unknown_share_class_fails() {
        let f = fixture().await;
        let err = f
            .uc
            .request_deposit(
                &ShareClassId::new("missing"),
                &AssetId::new("usdc"),
                &InvestorId::new("alice"),
                AssetAmount::new(100),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Investment(InvestmentError::ShareClassNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn cancel_deposit_refunds_pending() {
        let f = fixture().await;
        let asset = AssetId::new("usdc");
        let alice = InvestorId::new("alice");

        f.uc.request_deposit(&f.share_class_id, &asset, &alice, AssetAmount::new(100))
            .await
            .unwrap();
        let returned = f
            .uc
            .cancel_deposit(&f.share_class_id, &asset, &alice)
            .await
            .unwrap();
        assert_eq!(returned, AssetAmount::new(100));
    }

    #[tokio::test]
    async fn cancel_without_lane_fails() {
        let f = fixture().await;
        let err = f
            .uc
            .cancel_deposit(
                &f.share_class_id,
                &AssetId::new("usdc"),
                &InvestorId::new("alice"),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Investment(InvestmentError::NoOrderFound { .. })
        ));
    }

    #[tokio::test]
    async fn redeem_round_trip() {
        let f = fixture().await;
        let asset = AssetId::new("usdc");
        let alice = InvestorId::new("alice");

        let queued = f
            .uc
            .request_redeem(&f.share_class_id, &asset, &alice, ShareAmount::new(50))
            .await
            .unwrap();
        assert!(!queued);

        let returned = f
            .uc
            .cancel_redeem(&f.share_class_id, &asset, &alice)
            .await
            .unwrap();
        assert_eq!(returned, ShareAmount::new(50));
    }
}
