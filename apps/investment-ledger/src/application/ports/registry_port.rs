//! Asset Registry Port (Driven Port)
//!
//! Interface for resolving unit precision of assets and pools. Conversion
//! math needs the atom scale of both sides of every price.

use async_trait::async_trait;

use crate::domain::shared::{AssetId, Decimals, PoolId};

/// Registry lookup error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    /// Asset is not registered.
    #[error("Asset not registered: {asset_id}")]
    AssetNotFound {
        /// Asset id.
        asset_id: String,
    },

    /// Pool is not registered.
    #[error("Pool not registered: {pool_id}")]
    PoolNotFound {
        /// Pool id.
        pool_id: String,
    },

    /// Registry backend unavailable.
    #[error("Registry unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },
}

/// Port for unit precision lookups.
#[async_trait]
pub trait AssetRegistryPort: Send + Sync {
    /// Atom precision of a payment asset.
    async fn asset_decimals(&self, asset: &AssetId) -> Result<Decimals, RegistryError>;

    /// Atom precision of a pool's settlement denomination. Share atoms use
    /// the same precision.
    async fn pool_decimals(&self, pool: &PoolId) -> Result<Decimals, RegistryError>;
}
