//! Value objects for the share class context.

mod metadata;
mod metrics;
mod salt;

pub use metadata::{MAX_NAME_LEN, MAX_SYMBOL_LEN, ShareClassMetadata};
pub use metrics::ShareClassMetrics;
pub use salt::Salt;
