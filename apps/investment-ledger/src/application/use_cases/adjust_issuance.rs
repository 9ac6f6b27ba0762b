//! Adjust Issuance Use Case
//!
//! Administrative corrections to a share class's issued total, outside the
//! epoch flow (migrations, off-ledger settlements). Decreases stay bounded
//! by the issued total, same as revocation.

use std::sync::Arc;

use super::ApplicationError;
use crate::application::ports::EventPublisherPort;
use crate::domain::share_class::aggregate::ShareClass;
use crate::domain::share_class::errors::ShareClassError;
use crate::domain::share_class::repository::ShareClassRepository;
use crate::domain::shared::{ShareAmount, ShareClassId, Timestamp};

/// Use case for direct issuance adjustments.
pub struct AdjustIssuanceUseCase<S, E>
where
    S: ShareClassRepository,
    E: EventPublisherPort,
{
    share_classes: Arc<S>,
    event_publisher: Arc<E>,
}

impl<S, E> AdjustIssuanceUseCase<S, E>
where
    S: ShareClassRepository,
    E: EventPublisherPort,
{
    /// Create a new `AdjustIssuanceUseCase`.
    pub const fn new(share_classes: Arc<S>, event_publisher: Arc<E>) -> Self {
        Self {
            share_classes,
            event_publisher,
        }
    }

    /// Increase the issued total by `amount`.
    pub async fn increase_issuance(
        &self,
        id: &ShareClassId,
        amount: ShareAmount,
    ) -> Result<ShareAmount, ApplicationError> {
        let mut share_class = self.load(id).await?;
        share_class.increase_issuance(amount, Timestamp::now())?;
        self.save_and_publish(&mut share_class).await?;
        Ok(share_class.metrics().total_issuance)
    }

    /// Decrease the issued total by `amount`.
    pub async fn decrease_issuance(
        &self,
        id: &ShareClassId,
        amount: ShareAmount,
    ) -> Result<ShareAmount, ApplicationError> {
        let mut share_class = self.load(id).await?;
        share_class.decrease_issuance(amount, Timestamp::now())?;
        self.save_and_publish(&mut share_class).await?;
        Ok(share_class.metrics().total_issuance)
    }

    async fn load(&self, id: &ShareClassId) -> Result<ShareClass, ApplicationError> {
        self.share_classes
            .find_by_id(id)
            .await?
            .ok_or_else(|| {
                ShareClassError::NotFound {
                    id: id.to_string(),
                }
                .into()
            })
    }

    async fn save_and_publish(
        &self,
        share_class: &mut ShareClass,
    ) -> Result<(), ApplicationError> {
        self.share_classes.save(share_class).await?;
        if let Err(e) = self
            .event_publisher
            .publish_share_class_events(share_class.drain_events())
            .await
        {
            tracing::error!("Failed to publish share class events: {e}");
        }
        Ok(())
    }
}
