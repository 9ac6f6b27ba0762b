//! Decimal-precision value object for token denominations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// Maximum supported precision. `Decimal` holds 28 significant digits, so
/// scaling factors beyond this cannot be represented exactly.
const MAX_DECIMALS: u8 = 27;

/// The number of decimal places in a token's atom representation.
///
/// An asset with 6 decimals stores the nominal value `1.0` as `1_000_000`
/// atoms. Supplied by the external pool/asset registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Decimals(u8);

impl Decimals {
    /// Create a precision value.
    ///
    /// # Errors
    ///
    /// Returns error if the precision exceeds what `Decimal` can scale.
    pub fn new(places: u8) -> Result<Self, DomainError> {
        if places > MAX_DECIMALS {
            return Err(DomainError::InvalidValue {
                field: "decimals".to_string(),
                message: format!("precision {places} exceeds maximum {MAX_DECIMALS}"),
            });
        }
        Ok(Self(places))
    }

    /// The number of decimal places.
    #[must_use]
    pub const fn places(&self) -> u8 {
        self.0
    }

    /// Scaling factor between nominal units and atoms (`10^places`).
    #[must_use]
    pub fn atoms_per_unit(&self) -> Decimal {
        let mut factor = Decimal::ONE;
        for _ in 0..self.0 {
            factor *= Decimal::TEN;
        }
        factor
    }
}

impl fmt::Display for Decimals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_within_range() {
        let d = Decimals::new(6).unwrap();
        assert_eq!(d.places(), 6);
    }

    #[test]
    fn new_rejects_unrepresentable_precision() {
        assert!(Decimals::new(28).is_err());
        assert!(Decimals::new(27).is_ok());
    }

    #[test]
    fn atoms_per_unit() {
        assert_eq!(Decimals::new(0).unwrap().atoms_per_unit(), Decimal::ONE);
        assert_eq!(
            Decimals::new(6).unwrap().atoms_per_unit(),
            Decimal::new(1_000_000, 0)
        );
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Decimals::new(18).unwrap()), "18");
    }
}
