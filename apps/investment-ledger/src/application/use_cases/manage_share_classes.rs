//! Manage Share Classes Use Case
//!
//! Directory operations: create share classes, update their metadata and
//! record externally computed NAV marks.

use std::sync::Arc;

use super::ApplicationError;
use crate::application::ports::EventPublisherPort;
use crate::domain::share_class::aggregate::ShareClass;
use crate::domain::share_class::errors::ShareClassError;
use crate::domain::share_class::repository::ShareClassRepository;
use crate::domain::share_class::value_objects::{Salt, ShareClassMetadata};
use crate::domain::shared::{PoolId, Price, ShareClassId, Timestamp};

/// Use case for the share class directory.
pub struct ManageShareClassesUseCase<S, E>
where
    S: ShareClassRepository,
    E: EventPublisherPort,
{
    share_classes: Arc<S>,
    event_publisher: Arc<E>,
}

impl<S, E> ManageShareClassesUseCase<S, E>
where
    S: ShareClassRepository,
    E: EventPublisherPort,
{
    /// Create a new `ManageShareClassesUseCase`.
    pub const fn new(share_classes: Arc<S>, event_publisher: Arc<E>) -> Self {
        Self {
            share_classes,
            event_publisher,
        }
    }

    /// Create a share class in `pool`.
    ///
    /// The id is derived from the pool and the next per-pool index, so
    /// creation order alone determines ids. The salt must never have been
    /// used before, even by since-removed classes.
    pub async fn create_share_class(
        &self,
        pool: PoolId,
        name: &str,
        symbol: &str,
        salt: Salt,
    ) -> Result<ShareClass, ApplicationError> {
        let metadata = ShareClassMetadata::new(name, symbol)?;

        if self.share_classes.salt_used(&salt).await? {
            return Err(ShareClassError::AlreadyUsedSalt {
                salt: salt.to_string(),
            }
            .into());
        }

        let index = self.share_classes.count_for_pool(&pool).await? + 1;
        let mut share_class = ShareClass::new(pool, index, metadata, salt, Timestamp::now());

        self.share_classes.save(&share_class).await?;
        tracing::info!(
            share_class_id = %share_class.id(),
            index,
            "share class created"
        );

        self.publish(share_class.drain_events()).await;
        Ok(share_class)
    }

    /// Replace a share class's name and symbol.
    pub async fn update_metadata(
        &self,
        id: &ShareClassId,
        name: &str,
        symbol: &str,
    ) -> Result<ShareClass, ApplicationError> {
        let metadata = ShareClassMetadata::new(name, symbol)?;
        let mut share_class = self.load(id).await?;

        share_class.update_metadata(metadata, Timestamp::now());
        self.share_classes.save(&share_class).await?;

        self.publish(share_class.drain_events()).await;
        Ok(share_class)
    }

    /// Record an externally supplied NAV per share mark.
    pub async fn update_share_price(
        &self,
        id: &ShareClassId,
        nav_per_share: Price,
    ) -> Result<ShareClass, ApplicationError> {
        let mut share_class = self.load(id).await?;

        share_class.update_share_price(nav_per_share, Timestamp::now())?;
        self.share_classes.save(&share_class).await?;

        self.publish(share_class.drain_events()).await;
        Ok(share_class)
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

    async fn publish(&self, events: Vec<crate::domain::share_class::events::ShareClassEvent>) {
        if let Err(e) = self.event_publisher.publish_share_class_events(events).await {
            tracing::error!("Failed to publish share class events: {e}");
        }
    }
}
