//! Share Class Repository Trait
//!
//! Persistence abstraction for the directory. Implemented by adapters in
//! the infrastructure layer.

use async_trait::async_trait;

use super::aggregate::ShareClass;
use super::errors::ShareClassError;
use super::value_objects::Salt;
use crate::domain::shared::{PoolId, ShareClassId};

/// Repository trait for share class persistence.
#[async_trait]
pub trait ShareClassRepository: Send + Sync {
    /// Save a share class (insert or update).
    async fn save(&self, share_class: &ShareClass) -> Result<(), ShareClassError>;

    /// Find a share class by id.
    async fn find_by_id(&self, id: &ShareClassId) -> Result<Option<ShareClass>, ShareClassError>;

    /// Check whether a share class exists.
    async fn exists(&self, id: &ShareClassId) -> Result<bool, ShareClassError>;

    /// Whether a salt was ever used, across the directory's whole lifetime.
    async fn salt_used(&self, salt: &Salt) -> Result<bool, ShareClassError>;

    /// Number of share classes created for a pool so far.
    async fn count_for_pool(&self, pool: &PoolId) -> Result<u32, ShareClassError>;
}
