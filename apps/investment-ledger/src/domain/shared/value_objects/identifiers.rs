//! Strongly-typed identifiers for domain entities.
//!
//! These prevent mixing up IDs from different contexts.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_id!(PoolId, "Identifier for a pool of fund capital.");
define_id!(
    AssetId,
    "Identifier for a payment asset (deposit currency or settlement token)."
);
define_id!(InvestorId, "Identifier for an investor account.");

/// Identifier for a share class within a pool.
///
/// Derived deterministically from the pool id and a per-pool sequential
/// index, so the same creation order always produces the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareClassId(String);

impl ShareClassId {
    /// Derive the id for the `index`-th share class of a pool (1-based).
    #[must_use]
    pub fn derive(pool: &PoolId, index: u32) -> Self {
        Self(format!("{pool}-sc-{index}"))
    }

    /// Create an id from a raw string (for lookups of existing classes).
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShareClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ShareClassId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_id_new_and_display() {
        let id = PoolId::new("pool-1");
        assert_eq!(id.as_str(), "pool-1");
        assert_eq!(format!("{id}"), "pool-1");
    }

    #[test]
    fn asset_id_equality() {
        let a = AssetId::new("usdc");
        let b = AssetId::new("usdc");
        let c = AssetId::new("dai");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn investor_id_from_string() {
        let id: InvestorId = "alice".into();
        assert_eq!(id.as_str(), "alice");

        let id: InvestorId = String::from("bob").into();
        assert_eq!(id.as_str(), "bob");
    }

    #[test]
    fn share_class_id_derivation_is_deterministic() {
        let pool = PoolId::new("pool-1");
        let a = ShareClassId::derive(&pool, 1);
        let b = ShareClassId::derive(&pool, 1);
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "pool-1-sc-1");
    }

    #[test]
    fn share_class_id_differs_per_index_and_pool() {
        let pool = PoolId::new("pool-1");
        let other = PoolId::new("pool-2");
        assert_ne!(
            ShareClassId::derive(&pool, 1),
            ShareClassId::derive(&pool, 2)
        );
        assert_ne!(
            ShareClassId::derive(&pool, 1),
            ShareClassId::derive(&other, 1)
        );
    }

    #[test]
    fn serde_roundtrip() {
        let id = ShareClassId::derive(&PoolId::new("p"), 3);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"p-sc-3\"");

        let parsed: ShareClassId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn hash_works_for_collections() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(InvestorId::new("alice"));
        set.insert(InvestorId::new("bob"));
        set.insert(InvestorId::new("alice")); // duplicate

        assert_eq!(set.len(), 2);
    }
}
