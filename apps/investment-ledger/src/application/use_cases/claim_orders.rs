//! Claim Orders Use Case
//!
//! Investor-side claiming of processed epochs. One call settles one epoch;
//! the result says whether more remain. Claims move custody (shares or
//! payout assets out of lane escrow), so each runs inside a journal scope.

use std::sync::Arc;

use super::submit_requests::{
    investor_asset_account, investor_share_account, lane_asset_escrow, lane_share_escrow,
};
use super::ApplicationError;
use crate::application::ports::{AccountingJournalPort, EventPublisherPort, JournalEntry};
use crate::domain::investment::aggregate::{DepositClaim, InvestmentLane, RedeemClaim};
use crate::domain::investment::errors::InvestmentError;
use crate::domain::investment::repository::LaneRepository;
use crate::domain::share_class::repository::ShareClassRepository;
use crate::domain::shared::{AssetId, AtomAmount, InvestorId, ShareClassId, Timestamp};

/// Use case for claiming processed epochs.
pub struct ClaimOrdersUseCase<L, S, J, E>
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

impl<L, S, J, E> ClaimOrdersUseCase<L, S, J, E>
where
    L: LaneRepository,
    S: ShareClassRepository,
    J: AccountingJournalPort,
    E: EventPublisherPort,
{
    /// Create a new `ClaimOrdersUseCase`.
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

    /// Claim the investor's slice of the oldest unclaimed issued epoch.
    pub async fn claim_deposit(
        &self,
        share_class_id: &ShareClassId,
        asset_id: &AssetId,
        investor: &InvestorId,
    ) -> Result<DepositClaim, ApplicationError> {
        let mut lane = self.load_lane(share_class_id, asset_id, investor).await?;

        let scope = self.journal.open("deposit claim").await?;
        let claim = lane.claim_deposit(investor, Timestamp::now())?;

        if !claim.payout_shares.is_zero() {
            self.journal
                .post(
                    scope,
                    JournalEntry::debit(
                        lane_share_escrow(share_class_id, asset_id),
                        claim.payout_shares.atoms(),
                    ),
                )
                .await?;
            self.journal
                .post(
                    scope,
                    JournalEntry::credit(
                        investor_share_account(investor, share_class_id),
                        claim.payout_shares.atoms(),
                    ),
                )
                .await?;
        }
        if !claim.cancelled_assets.is_zero() {
            self.journal
                .post(
                    scope,
                    JournalEntry::debit(
                        lane_asset_escrow(share_class_id, asset_id),
                        claim.cancelled_assets.atoms(),
                    ),
                )
                .await?;
            self.journal
                .post(
                    scope,
                    JournalEntry::credit(
                        investor_asset_account(investor, asset_id),
                        claim.cancelled_assets.atoms(),
                    ),
                )
                .await?;
        }

        self.lanes.save(&lane).await?;
        self.journal.close(scope).await?;

        self.publish(lane.drain_events()).await;
        Ok(claim)
    }

    /// Claim the investor's slice of the oldest unclaimed revoked epoch.
    pub async fn claim_redeem(
        &self,
        share_class_id: &ShareClassId,
        asset_id: &AssetId,
        investor: &InvestorId,
    ) -> Result<RedeemClaim, ApplicationError> {
        let mut lane = self.load_lane(share_class_id, asset_id, investor).await?;

        let scope = self.journal.open("redeem claim").await?;
        let claim = lane.claim_redeem(investor, Timestamp::now())?;

        if !claim.payout_assets.is_zero() {
            self.journal
                .post(
                    scope,
                    JournalEntry::debit(
                        lane_asset_escrow(share_class_id, asset_id),
                        claim.payout_assets.atoms(),
                    ),
                )
                .await?;
            self.journal
                .post(
                    scope,
                    JournalEntry::credit(
                        investor_asset_account(investor, asset_id),
                        claim.payout_assets.atoms(),
                    ),
                )
                .await?;
        }
        if !claim.cancelled_shares.is_zero() {
            self.journal
                .post(
                    scope,
                    JournalEntry::debit(
                        lane_share_escrow(share_class_id, asset_id),
                        claim.cancelled_shares.atoms(),
                    ),
                )
                .await?;
            self.journal
                .post(
                    scope,
                    JournalEntry::credit(
                        investor_share_account(investor, share_class_id),
                        claim.cancelled_shares.atoms(),
                    ),
                )
                .await?;
        }

        self.lanes.save(&lane).await?;
        self.journal.close(scope).await?;

        self.publish(lane.drain_events()).await;
        Ok(claim)
    }

    async fn load_lane(
        &self,
        share_class_id: &ShareClassId,
        asset_id: &AssetId,
        investor: &InvestorId,
    ) -> Result<InvestmentLane, ApplicationError> {
        if !self.share_classes.exists(share_class_id).await? {
            return Err(InvestmentError::ShareClassNotFound {
                id: share_class_id.to_string(),
            }
            .into());
        }
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
    use crate::domain::share_class::value_objects::{Salt, ShareClassMetadata};
    use crate::domain::shared::{AssetAmount, Decimals, PoolId, Price, ShareAmount};
    use crate::infrastructure::persistence::{InMemoryLaneRepository, InMemoryShareClassRepository};

    struct Fixture {
        claim: ClaimOrdersUseCase<
            InMemoryLaneRepository,
            InMemoryShareClassRepository,
            NoOpJournal,
            NoOpEventPublisher,
        >,
        lanes: Arc<InMemoryLaneRepository>,
        share_class_id: ShareClassId,
        asset: AssetId,
    }

    async fn fixture() -> Fixture {
        let lanes = Arc::new(InMemoryLaneRepository::new());
        let share_classes = Arc::new(InMemoryShareClassRepository::new());

        let share_class = crate::domain::share_class::aggregate::ShareClass::new(
            PoolId::new("pool-1"),
            1,
            ShareClassMetadata::new("Senior", "SNR").unwrap(),
            Salt::from_seed(1).unwrap(),
            Timestamp::now(),
        );
        let share_class_id = share_class.id().clone();
        share_classes.save(&share_class).await.unwrap();

        Fixture {
            claim: ClaimOrdersUseCase::new(
                Arc::clone(&lanes),
                share_classes,
                Arc::new(NoOpJournal),
                Arc::new(NoOpEventPublisher),
            ),
            lanes,
            share_class_id,
            asset: AssetId::new("usdc"),
        }
    }

    #[tokio::test]
    async fn claim_without_lane_fails() {
        let f = fixture().await;
        let err = f
            .claim
            .claim_deposit(&f.share_class_id, &f.asset, &InvestorId::new("alice"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Investment(InvestmentError::NoOrderFound { .. })
        ));
    }

    #[tokio::test]
    async fn claim_issued_epoch_delivers_shares() {
        let f = fixture().await;
        let alice = InvestorId::new("alice");
        let dec = Decimals::new(6).unwrap();

        // prepare an issued epoch directly on the lane
        let mut lane = InvestmentLane::new(f.share_class_id.clone(), f.asset.clone(), Timestamp::now());
        lane.request_deposit(&alice, AssetAmount::new(100), Timestamp::now())
            .unwrap();
        lane.approve_deposits(
            crate::domain::investment::value_objects::EpochId::new(1),
            AssetAmount::new(100),
            Price::ONE,
            dec,
            dec,
            Timestamp::now(),
        )
        .unwrap();
        lane.issue_shares(
            crate::domain::investment::value_objects::EpochId::new(1),
            Price::ONE,
            Timestamp::now(),
        )
        .unwrap();
        f.lanes.save(&lane).await.unwrap();

        let claim = f
            .claim
            .claim_deposit(&f.share_class_id, &f.asset, &alice)
            .await
            .unwrap();
        assert_eq!(claim.payout_shares, ShareAmount::new(100));
        assert!(!claim.can_claim_again);
    }
}
