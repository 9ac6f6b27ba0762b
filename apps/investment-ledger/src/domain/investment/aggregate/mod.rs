//! Investment lane aggregate and its order books.

mod lane;
mod side_book;

pub use lane::{DepositClaim, EpochIssuance, EpochRevocation, InvestmentLane, RedeemClaim};
pub use side_book::{ClaimEpochData, ClaimOutcome, SideBook};
