//! Value objects for the investment context.

mod epoch;
mod epoch_amounts;
mod user_order;

pub use epoch::{EpochCounter, EpochCounters, EpochId};
pub use epoch_amounts::{EpochInvestAmounts, EpochRedeemAmounts};
pub use user_order::{OrderState, QueuedAction, UserOrder};
