//! Event Publisher Port (Driven Port)
//!
//! Interface for publishing domain events to external systems.

use async_trait::async_trait;

use crate::domain::investment::events::InvestmentEvent;
use crate::domain::share_class::events::ShareClassEvent;

/// Event publishing error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EventPublishError {
    /// Connection error.
    #[error("Event publish connection error: {message}")]
    ConnectionError {
        /// Error message.
        message: String,
    },

    /// Serialization error.
    #[error("Event serialization error: {message}")]
    SerializationError {
        /// Error message.
        message: String,
    },

    /// Publishing failed.
    #[error("Event publish failed: {message}")]
    PublishFailed {
        /// Error message.
        message: String,
    },
}

/// Port for publishing domain events.
#[async_trait]
pub trait EventPublisherPort: Send + Sync {
    /// Publish share class events.
    async fn publish_share_class_events(
        &self,
        events: Vec<ShareClassEvent>,
    ) -> Result<(), EventPublishError>;

    /// Publish investment events.
    async fn publish_investment_events(
        &self,
        events: Vec<InvestmentEvent>,
    ) -> Result<(), EventPublishError>;
}

/// No-op event publisher for testing.
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisherPort for NoOpEventPublisher {
    async fn publish_share_class_events(
        &self,
        _events: Vec<ShareClassEvent>,
    ) -> Result<(), EventPublishError> {
        Ok(())
    }

    async fn publish_investment_events(
        &self,
        _events: Vec<InvestmentEvent>,
    ) -> Result<(), EventPublishError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::investment::value_objects::EpochId;
    use crate::domain::shared::{
        AssetAmount, AssetId, AtomAmount, InvestorId, ShareClassId, Timestamp,
    };

    #[tokio::test]
    async fn no_op_publisher_succeeds() {
        let publisher = NoOpEventPublisher;

        let event = InvestmentEvent::DepositRequested {
            share_class_id: ShareClassId::new("pool-1-sc-0"),
            asset_id: AssetId::new("usdc"),
            investor_id: InvestorId::new("alice"),
            amount: AssetAmount::new(100),
            epoch_id: EpochId::new(1),
            queued: false,
            old_pending: AssetAmount::ZERO,
            new_pending: AssetAmount::new(100),
            queued_amount: AssetAmount::ZERO,
            occurred_at: Timestamp::now(),
        };

        let result = publisher.publish_investment_events(vec![event]).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn no_op_publisher_empty_batch() {
        let publisher = NoOpEventPublisher;
        assert!(
            publisher
                .publish_share_class_events(Vec::new())
                .await
                .is_ok()
        );
    }
}
