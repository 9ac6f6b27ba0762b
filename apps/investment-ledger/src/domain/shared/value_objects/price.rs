//! Price value object for fixed-point exchange rates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::domain::shared::DomainError;

/// An exchange rate between two unit kinds.
///
/// Used both as the asset price at approval time (pool units per asset
/// unit) and as the NAV at issuance/revocation time (pool units per share).
/// Backed by `Decimal`; never floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price from a Decimal.
    #[must_use]
    pub const fn new(rate: Decimal) -> Self {
        Self(rate)
    }

    /// Create a price from an integer rate.
    #[must_use]
    pub fn from_i64(rate: i64) -> Self {
        Self(Decimal::new(rate, 0))
    }

    /// Create a price from a rational `num / den`.
    ///
    /// # Errors
    ///
    /// Returns error if `den` is zero.
    pub fn from_ratio(num: i64, den: i64) -> Result<Self, DomainError> {
        if den == 0 {
            return Err(DomainError::InvalidValue {
                field: "price".to_string(),
                message: "ratio denominator must be non-zero".to_string(),
            });
        }
        Ok(Self(Decimal::new(num, 0) / Decimal::new(den, 0)))
    }

    /// The identity price (1 pool unit per unit).
    pub const ONE: Self = Self(Decimal::ONE);

    /// Zero price; marks "not yet stamped" NAV slots.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Get the inner Decimal rate.
    #[must_use]
    pub const fn rate(&self) -> Decimal {
        self.0
    }

    /// Returns true if the rate is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == Decimal::ZERO
    }

    /// Validate the price for use in an approval or issuance.
    ///
    /// # Errors
    ///
    /// Returns error if the rate is zero or negative.
    pub fn validate_positive(&self) -> Result<(), DomainError> {
        if self.0 <= Decimal::ZERO {
            return Err(DomainError::InvalidValue {
                field: "price".to_string(),
                message: "price must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// The reciprocal rate, `1 / self`.
    ///
    /// Share issuance divides pool value by NAV as a multiplication with the
    /// reciprocal, so floor rounding happens exactly once, at atom scale.
    ///
    /// # Errors
    ///
    /// Returns error if the rate is zero.
    pub fn reciprocal(&self) -> Result<Self, DomainError> {
        if self.0 == Decimal::ZERO {
            return Err(DomainError::InvalidValue {
                field: "price".to_string(),
                message: "cannot take reciprocal of zero price".to_string(),
            });
        }
        Ok(Self(Decimal::ONE / self.0))
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl From<Decimal> for Price {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Price> for Decimal {
    fn from(value: Price) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn price_new_and_rate() {
        let p = Price::new(dec!(1.1));
        assert_eq!(p.rate(), dec!(1.1));
        assert_eq!(format!("{p}"), "1.1");
    }

    #[test]
    fn price_from_ratio() {
        let p = Price::from_ratio(50, 8).unwrap();
        assert_eq!(p.rate(), dec!(6.25));
    }

    #[test]
    fn price_from_ratio_zero_denominator() {
        assert!(Price::from_ratio(1, 0).is_err());
    }

    #[test]
    fn price_validate_positive() {
        assert!(Price::from_i64(10).validate_positive().is_ok());
        assert!(Price::ZERO.validate_positive().is_err());
        assert!(Price::new(dec!(-1)).validate_positive().is_err());
    }

    #[test]
    fn price_reciprocal() {
        let p = Price::from_i64(4);
        assert_eq!(p.reciprocal().unwrap().rate(), dec!(0.25));
    }

    #[test]
    fn price_reciprocal_of_zero_fails() {
        assert!(Price::ZERO.reciprocal().is_err());
    }

    #[test]
    fn price_ordering() {
        assert!(Price::from_i64(2) > Price::ONE);
        assert!(Price::ZERO < Price::ONE);
    }

    #[test]
    fn price_default_is_unstamped() {
        assert!(Price::default().is_zero());
    }

    #[test]
    fn serde_roundtrip() {
        let p = Price::new(dec!(6.25));
        let json = serde_json::to_string(&p).unwrap();
        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, p);
    }
}
