//! Process Epochs Use Case
//!
//! Share issuance for approved deposit epochs and share revocation for
//! approved redemption epochs, both at an externally computed NAV. Issuance
//! and revocation move custody, so each runs inside a journal scope: minted
//! shares land in lane escrow, settled assets move between lane escrow and
//! the pool treasury.

use std::sync::Arc;

use super::submit_requests::{lane_asset_escrow, lane_share_escrow};
use super::ApplicationError;
use crate::application::ports::{
    AccountingJournalPort, AssetRegistryPort, EventPublisherPort, JournalEntry,
};
use crate::domain::investment::aggregate::{EpochIssuance, EpochRevocation, InvestmentLane};
use crate::domain::investment::errors::InvestmentError;
use crate::domain::investment::repository::LaneRepository;
use crate::domain::investment::value_objects::EpochId;
use crate::domain::share_class::aggregate::ShareClass;
use crate::domain::share_class::repository::ShareClassRepository;
use crate::domain::shared::{AssetId, AtomAmount, PoolId, Price, ShareClassId, Timestamp};

fn share_supply(share_class: &ShareClassId) -> String {
    format!("shares:{share_class}:supply")
}

fn pool_treasury(pool: &PoolId, asset: &AssetId) -> String {
    format!("pool:{pool}:treasury:{asset}")
}

/// Use case for processing approved epochs.
pub struct ProcessEpochsUseCase<L, S, R, J, E>
where
    L: LaneRepository,
    S: ShareClassRepository,
    R: AssetRegistryPort,
    J: AccountingJournalPort,
    E: EventPublisherPort,
{
    lanes: Arc<L>,
    share_classes: Arc<S>,
    registry: Arc<R>,
    journal: Arc<J>,
    event_publisher: Arc<E>,
}

impl<L, S, R, J, E> ProcessEpochsUseCase<L, S, R, J, E>
where
    L: LaneRepository,
    S: ShareClassRepository,
    R: AssetRegistryPort,
    J: AccountingJournalPort,
    E: EventPublisherPort,
{
    /// Create a new `ProcessEpochsUseCase`.
    pub const fn new(
        lanes: Arc<L>,
        share_classes: Arc<S>,
        registry: Arc<R>,
        journal: Arc<J>,
        event_publisher: Arc<E>,
    ) -> Self {
        Self {
            lanes,
            share_classes,
            registry,
            journal,
            event_publisher,
        }
    }

    /// Issue shares for an approved deposit epoch at `nav`.
    ///
    /// The minted shares raise the share class's issuance total and sit in
    /// lane escrow until investors claim them; the epoch's approved assets
    /// settle into the pool treasury.
    pub async fn issue_shares(
        &self,
        share_class_id: &ShareClassId,
        asset_id: &AssetId,
        epoch: EpochId,
        nav: Price,
    ) -> Result<EpochIssuance, ApplicationError> {
        let mut share_class = self.load_share_class(share_class_id).await?;
        let mut lane = self.load_lane(share_class_id, asset_id, epoch).await?;

        let scope = self.journal.open("share issuance").await?;
        let issuance = lane.issue_shares(epoch, nav, Timestamp::now())?;
        let approved_asset = lane
            .invest_epoch(epoch)
            .map(|snapshot| snapshot.approved_asset)
            .ok_or(InvestmentError::EpochNotFound {
                epoch: epoch.value(),
            })?;
        share_class.increase_issuance(issuance.issued_shares, Timestamp::now())?;

        self.journal
            .post(
                scope,
                JournalEntry::debit(share_supply(share_class_id), issuance.issued_shares.atoms()),
            )
            .await?;
        self.journal
            .post(
                scope,
                JournalEntry::credit(
                    lane_share_escrow(share_class_id, asset_id),
                    issuance.issued_shares.atoms(),
                ),
            )
            .await?;
        self.journal
            .post(
                scope,
                JournalEntry::debit(
                    lane_asset_escrow(share_class_id, asset_id),
                    approved_asset.atoms(),
                ),
            )
            .await?;
        self.journal
            .post(
                scope,
                JournalEntry::credit(
                    pool_treasury(share_class.pool(), asset_id),
                    approved_asset.atoms(),
                ),
            )
            .await?;

        self.lanes.save(&lane).await?;
        self.share_classes.save(&share_class).await?;
        self.journal.close(scope).await?;
        tracing::info!(
            share_class_id = %share_class_id,
            asset_id = %asset_id,
            epoch = %epoch,
            issued = %issuance.issued_shares,
            "shares issued"
        );

        self.publish(&mut lane, &mut share_class).await;
        Ok(issuance)
    }

    /// Revoke shares for an approved redemption epoch at `nav`.
    ///
    /// The burned shares lower the share class's issuance total; the payout
    /// moves from the pool treasury into lane escrow for claiming.
    pub async fn revoke_shares(
        &self,
        share_class_id: &ShareClassId,
        asset_id: &AssetId,
        epoch: EpochId,
        nav: Price,
    ) -> Result<EpochRevocation, ApplicationError> {
        let mut share_class = self.load_share_class(share_class_id).await?;
        let asset_dec = self.registry.asset_decimals(asset_id).await?;
        let pool_dec = self.registry.pool_decimals(share_class.pool()).await?;
        let mut lane = self.load_lane(share_class_id, asset_id, epoch).await?;

        let scope = self.journal.open("share revocation").await?;
        let revocation = lane.revoke_shares(
            epoch,
            nav,
            asset_dec,
            pool_dec,
            share_class.metrics().total_issuance,
            Timestamp::now(),
        )?;
        share_class.decrease_issuance(revocation.revoked_shares, Timestamp::now())?;

        self.journal
            .post(
                scope,
                JournalEntry::debit(
                    lane_share_escrow(share_class_id, asset_id),
                    revocation.revoked_shares.atoms(),
                ),
            )
            .await?;
        self.journal
            .post(
                scope,
                JournalEntry::credit(
                    share_supply(share_class_id),
                    revocation.revoked_shares.atoms(),
                ),
            )
            .await?;
        self.journal
            .post(
                scope,
                JournalEntry::debit(
                    pool_treasury(share_class.pool(), asset_id),
                    revocation.payout_asset.atoms(),
                ),
            )
            .await?;
        self.journal
            .post(
                scope,
                JournalEntry::credit(
                    lane_asset_escrow(share_class_id, asset_id),
                    revocation.payout_asset.atoms(),
                ),
            )
            .await?;

        self.lanes.save(&lane).await?;
        self.share_classes.save(&share_class).await?;
        self.journal.close(scope).await?;
        tracing::info!(
            share_class_id = %share_class_id,
            asset_id = %asset_id,
            epoch = %epoch,
            revoked = %revocation.revoked_shares,
            payout = %revocation.payout_asset,
            "shares revoked"
        );

        self.publish(&mut lane, &mut share_class).await;
        Ok(revocation)
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
        epoch: EpochId,
    ) -> Result<InvestmentLane, ApplicationError> {
        self.lanes
            .find(share_class_id, asset_id)
            .await?
            .ok_or_else(|| {
                InvestmentError::EpochNotFound {
                    epoch: epoch.value(),
                }
                .into()
            })
    }

    async fn publish(&self, lane: &mut InvestmentLane, share_class: &mut ShareClass) {
        if let Err(e) = self
            .event_publisher
            .publish_investment_events(lane.drain_events())
            .await
        {
            tracing::error!("Failed to publish investment events: {e}");
        }
        if let Err(e) = self
            .event_publisher
            .publish_share_class_events(share_class.drain_events())
            .await
        {
            tracing::error!("Failed to publish share class events: {e}");
        }
    }
}
