//! In-memory asset registry for testing and development.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::application::ports::{AssetRegistryPort, RegistryError};
use crate::domain::shared::{AssetId, Decimals, PoolId};

/// In-memory implementation of `AssetRegistryPort`.
///
/// Suitable for testing and development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryAssetRegistry {
    assets: RwLock<HashMap<String, Decimals>>,
    pools: RwLock<HashMap<String, Decimals>>,
}

impl InMemoryAssetRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            assets: RwLock::new(HashMap::new()),
            pools: RwLock::new(HashMap::new()),
        }
    }

    /// Register an asset's atom precision.
    ///
    /// # Panics
    ///
    /// Panics if `decimals` exceeds the supported precision range.
    pub fn register_asset(&self, asset: AssetId, decimals: u8) {
        let decimals = Decimals::new(decimals).expect("asset decimals within supported range");
        let mut assets = self.assets.write().unwrap_or_else(PoisonError::into_inner);
        assets.insert(asset.to_string(), decimals);
    }

    /// Register a pool's settlement precision.
    ///
    /// # Panics
    ///
    /// Panics if `decimals` exceeds the supported precision range.
    pub fn register_pool(&self, pool: PoolId, decimals: u8) {
        let decimals = Decimals::new(decimals).expect("pool decimals within supported range");
        let mut pools = self.pools.write().unwrap_or_else(PoisonError::into_inner);
        pools.insert(pool.to_string(), decimals);
    }
}

#[async_trait]
impl AssetRegistryPort for InMemoryAssetRegistry {
    async fn asset_decimals(&self, asset: &AssetId) -> Result<Decimals, RegistryError> {
        let assets = self.assets.read().unwrap_or_else(PoisonError::into_inner);
        assets
            .get(asset.as_str())
            .copied()
            .ok_or_else(|| RegistryError::AssetNotFound {
                asset_id: asset.to_string(),
            })
    }

    async fn pool_decimals(&self, pool: &PoolId) -> Result<Decimals, RegistryError> {
        let pools = self.pools.read().unwrap_or_else(PoisonError::into_inner);
        pools
            .get(pool.as_str())
            .copied()
            .ok_or_else(|| RegistryError::PoolNotFound {
                pool_id: pool.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_registered_asset() {
        let registry = InMemoryAssetRegistry::new();
        registry.register_asset(AssetId::new("usdc"), 6);

        let decimals = registry.asset_decimals(&AssetId::new("usdc")).await.unwrap();
        assert_eq!(decimals.places(), 6);
    }

    #[tokio::test]
    async fn unknown_asset_fails() {
        let registry = InMemoryAssetRegistry::new();
        let err = registry
            .asset_decimals(&AssetId::new("dai"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::AssetNotFound { .. }));
    }

    #[tokio::test]
    async fn unknown_pool_fails() {
        let registry = InMemoryAssetRegistry::new();
        let err = registry
            .pool_decimals(&PoolId::new("pool-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::PoolNotFound { .. }));
    }
}
