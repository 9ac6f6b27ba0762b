//! In-memory repositories for testing and development.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::investment::aggregate::InvestmentLane;
use crate::domain::investment::errors::InvestmentError;
use crate::domain::investment::repository::LaneRepository;
use crate::domain::share_class::aggregate::ShareClass;
use crate::domain::share_class::errors::ShareClassError;
use crate::domain::share_class::repository::ShareClassRepository;
use crate::domain::share_class::value_objects::Salt;
use crate::domain::shared::{AssetId, PoolId, ShareClassId};

/// In-memory implementation of `ShareClassRepository`.
///
/// Suitable for testing and development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryShareClassRepository {
    share_classes: RwLock<HashMap<String, ShareClass>>,
    // salts stay recorded forever, surviving any future removal of classes
    used_salts: RwLock<HashSet<String>>,
}

impl InMemoryShareClassRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            share_classes: RwLock::new(HashMap::new()),
            used_salts: RwLock::new(HashSet::new()),
        }
    }

    /// Number of share classes stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.share_classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ShareClassRepository for InMemoryShareClassRepository {
    async fn save(&self, share_class: &ShareClass) -> Result<(), ShareClassError> {
        let mut salts = self
            .used_salts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        salts.insert(share_class.salt().to_string());
        drop(salts);

        let mut share_classes = self
            .share_classes
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        share_classes.insert(share_class.id().to_string(), share_class.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ShareClassId) -> Result<Option<ShareClass>, ShareClassError> {
        let share_classes = self
            .share_classes
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(share_classes.get(id.as_str()).cloned())
    }

    async fn exists(&self, id: &ShareClassId) -> Result<bool, ShareClassError> {
        let share_classes = self
            .share_classes
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(share_classes.contains_key(id.as_str()))
    }

    async fn salt_used(&self, salt: &Salt) -> Result<bool, ShareClassError> {
        let salts = self
            .used_salts
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(salts.contains(&salt.to_string()))
    }

    async fn count_for_pool(&self, pool: &PoolId) -> Result<u32, ShareClassError> {
        let share_classes = self
            .share_classes
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let count = share_classes
            .values()
            .filter(|sc| sc.pool() == pool)
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

fn lane_key(share_class: &ShareClassId, asset: &AssetId) -> String {
    format!("{share_class}|{asset}")
}

/// In-memory implementation of `LaneRepository`.
///
/// Suitable for testing and development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryLaneRepository {
    lanes: RwLock<HashMap<String, InvestmentLane>>,
}

impl InMemoryLaneRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lanes: RwLock::new(HashMap::new()),
        }
    }

    /// Number of lanes stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lanes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LaneRepository for InMemoryLaneRepository {
    async fn save(&self, lane: &InvestmentLane) -> Result<(), InvestmentError> {
        let mut lanes = self.lanes.write().unwrap_or_else(PoisonError::into_inner);
        lanes.insert(
            lane_key(lane.share_class_id(), lane.asset_id()),
            lane.clone(),
        );
        Ok(())
    }

    async fn find(
        &self,
        share_class: &ShareClassId,
        asset: &AssetId,
    ) -> Result<Option<InvestmentLane>, InvestmentError> {
        let lanes = self.lanes.read().unwrap_or_else(PoisonError::into_inner);
        Ok(lanes.get(&lane_key(share_class, asset)).cloned())
    }

    async fn find_by_share_class(
        &self,
        share_class: &ShareClassId,
    ) -> Result<Vec<InvestmentLane>, InvestmentError> {
        let lanes = self.lanes.read().unwrap_or_else(PoisonError::into_inner);
        Ok(lanes
            .values()
            .filter(|lane| lane.share_class_id() == share_class)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::share_class::value_objects::ShareClassMetadata;
    use crate::domain::shared::Timestamp;

    fn share_class(pool: &str, index: u32, seed: u128) -> ShareClass {
        ShareClass::new(
            PoolId::new(pool),
            index,
            ShareClassMetadata::new("Senior", "SNR").unwrap(),
            Salt::from_seed(seed).unwrap(),
            Timestamp::now(),
        )
    }

    #[tokio::test]
    async fn share_class_round_trip() {
        let repo = InMemoryShareClassRepository::new();
        let sc = share_class("pool-1", 1, 1);

        repo.save(&sc).await.unwrap();
        let found = repo.find_by_id(sc.id()).await.unwrap().unwrap();
        assert_eq!(found.id(), sc.id());
        assert!(repo.exists(sc.id()).await.unwrap());
    }

    #[tokio::test]
    async fn salts_are_remembered() {
        let repo = InMemoryShareClassRepository::new();
        let salt = Salt::from_seed(9).unwrap();
        assert!(!repo.salt_used(&salt).await.unwrap());

        let sc = ShareClass::new(
            PoolId::new("pool-1"),
            1,
            ShareClassMetadata::new("Senior", "SNR").unwrap(),
            salt,
            Timestamp::now(),
        );
        repo.save(&sc).await.unwrap();
        assert!(repo.salt_used(&salt).await.unwrap());
    }

    #[tokio::test]
    async fn count_for_pool_ignores_other_pools() {
        let repo = InMemoryShareClassRepository::new();
        repo.save(&share_class("pool-1", 1, 1)).await.unwrap();
        repo.save(&share_class("pool-1", 2, 2)).await.unwrap();
        repo.save(&share_class("pool-2", 1, 3)).await.unwrap();

        assert_eq!(repo.count_for_pool(&PoolId::new("pool-1")).await.unwrap(), 2);
        assert_eq!(repo.count_for_pool(&PoolId::new("pool-3")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn lane_round_trip() {
        let repo = InMemoryLaneRepository::new();
        let lane = InvestmentLane::new(
            ShareClassId::new("pool-1-sc-1"),
            AssetId::new("usdc"),
            Timestamp::now(),
        );

        repo.save(&lane).await.unwrap();
        let found = repo
            .find(&ShareClassId::new("pool-1-sc-1"), &AssetId::new("usdc"))
            .await
            .unwrap();
        assert!(found.is_some());
        assert!(
            repo.find(&ShareClassId::new("pool-1-sc-1"), &AssetId::new("dai"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn find_by_share_class_filters() {
        let repo = InMemoryLaneRepository::new();
        let sc = ShareClassId::new("pool-1-sc-1");
        repo.save(&InvestmentLane::new(
            sc.clone(),
            AssetId::new("usdc"),
            Timestamp::now(),
        ))
        .await
        .unwrap();
        repo.save(&InvestmentLane::new(
            sc.clone(),
            AssetId::new("dai"),
            Timestamp::now(),
        ))
        .await
        .unwrap();
        repo.save(&InvestmentLane::new(
            ShareClassId::new("pool-2-sc-1"),
            AssetId::new("usdc"),
            Timestamp::now(),
        ))
        .await
        .unwrap();

        assert_eq!(repo.find_by_share_class(&sc).await.unwrap().len(), 2);
    }
}
