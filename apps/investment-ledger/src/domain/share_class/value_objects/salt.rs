//! Salt value object for share class creation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::share_class::errors::ShareClassError;

/// A 32-byte salt that must be globally unique across the directory's whole
/// lifetime and must not be zero.
///
/// Uniqueness is enforced by the directory; this type enforces non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Salt([u8; 32]);

impl Salt {
    /// Create a salt from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSalt` if all bytes are zero.
    pub fn new(bytes: [u8; 32]) -> Result<Self, ShareClassError> {
        if bytes.iter().all(|b| *b == 0) {
            return Err(ShareClassError::InvalidSalt);
        }
        Ok(Self(bytes))
    }

    /// Build a salt from an integer seed, for callers that track salts as
    /// counters rather than hashes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSalt` for seed zero.
    pub fn from_seed(seed: u128) -> Result<Self, ShareClassError> {
        let mut bytes = [0u8; 32];
        bytes[16..].copy_from_slice(&seed.to_be_bytes());
        Self::new(bytes)
    }

    /// The raw salt bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
