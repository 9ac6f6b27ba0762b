//! Shared kernel: identifiers, amounts, prices, and common errors.

mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::{
    AssetAmount, AssetId, AtomAmount, Decimals, InvestorId, PoolAmount, PoolId, Price,
    ShareAmount, ShareClassId, Timestamp,
};
