//! Shared value objects used across bounded contexts.

mod amounts;
mod decimals;
mod identifiers;
mod price;
mod timestamp;

pub use amounts::{AssetAmount, AtomAmount, PoolAmount, ShareAmount};
pub use decimals::Decimals;
pub use identifiers::{AssetId, InvestorId, PoolId, ShareClassId};
pub use price::Price;
pub use timestamp::Timestamp;
