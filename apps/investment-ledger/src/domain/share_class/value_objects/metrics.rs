//! Global per-share-class metrics.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{Price, ShareAmount};

/// Global issuance state of a share class.
///
/// `total_issuance` moves with every issuance/revocation and with the
/// explicit epoch-bypass adjustments; `nav_per_share` is the last price
/// pushed from outside (or stamped at issuance/revocation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShareClassMetrics {
    /// Total shares currently issued.
    pub total_issuance: ShareAmount,
    /// Last known price of one share in pool currency.
    pub nav_per_share: Price,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::AtomAmount;

    #[test]
    fn default_metrics_are_empty() {
        let m = ShareClassMetrics::default();
        assert!(m.total_issuance.is_zero());
        assert!(m.nav_per_share.is_zero());
    }

    #[test]
    fn serde_roundtrip() {
        let m = ShareClassMetrics {
            total_issuance: ShareAmount::new(1_000),
            nav_per_share: Price::from_i64(2),
        };
        let json = serde_json::to_string(&m).unwrap();
        let parsed: ShareClassMetrics = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, m);
    }
}
