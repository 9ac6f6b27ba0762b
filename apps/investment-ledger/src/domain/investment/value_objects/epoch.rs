//! Epoch identifiers and per-lane counters.
//!
//! Each (share class, asset) lane tracks four independent monotonic counters.
//! An operation must name the exact current counter value and the counter then
//! advances by one; there are no gaps and no repeats.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::super::errors::InvestmentError;

/// Identifier of a processing epoch within a lane. Counting starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpochId(u32);

impl EpochId {
    /// First epoch of a fresh lane.
    pub const FIRST: Self = Self(1);

    /// Create an epoch id from its raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw counter value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// The epoch after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for EpochId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EpochId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A single monotonic epoch counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochCounter(EpochId);

impl EpochCounter {
    /// Current value: the epoch the next operation must name.
    #[must_use]
    pub const fn current(self) -> EpochId {
        self.0
    }

    /// Check the supplied epoch against the current value, then advance.
    pub fn ensure_and_advance(&mut self, epoch: EpochId) -> Result<(), InvestmentError> {
        if epoch != self.0 {
            return Err(InvestmentError::EpochNotInSequence {
                got: epoch.value(),
                expected: self.0.value(),
            });
        }
        self.0 = self.0.next();
        Ok(())
    }
}

impl Default for EpochCounter {
    fn default() -> Self {
        Self(EpochId::FIRST)
    }
}

/// The four counters of one lane.
///
/// Deposit approval and issuance advance independently, as do redeem approval
/// and revocation. Issuance can only lag approval, never overtake it; the
/// aggregate enforces that ordering, not this struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EpochCounters {
    /// Next deposit epoch to approve.
    pub deposit: EpochCounter,
    /// Next approved deposit epoch to issue shares for.
    pub issue: EpochCounter,
    /// Next redeem epoch to approve.
    pub redeem: EpochCounter,
    /// Next approved redeem epoch to revoke shares for.
    pub revoke: EpochCounter,
}
