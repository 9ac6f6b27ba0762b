//! Token amount value objects in smallest-unit ("atom") precision.
//!
//! Amounts are integer base units, never fractional: the dust guarantees of
//! the claim engine are defined at atom granularity, so all pro-rata math
//! floors to whole atoms. The unit kinds (asset, pool, share) are distinct
//! newtypes to prevent cross-unit mixups.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// Greatest common divisor (Euclid). Used to reduce pro-rata fractions
/// before multiplying so `a * num` stays within `u128` when possible.
const fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Floor of `value * num / den` with gcd reduction and overflow checking.
fn mul_div_floor_raw(value: u128, num: u128, den: u128) -> Result<u128, DomainError> {
    if den == 0 {
        return Err(DomainError::InvalidValue {
            field: "denominator".to_string(),
            message: "pro-rata denominator must be non-zero".to_string(),
        });
    }
    let g1 = gcd(value, den);
    let (value, den) = (value / g1, den / g1);
    let g2 = gcd(num, den);
    let (num, den) = (num / g2, den / g2);

    value
        .checked_mul(num)
        .map(|p| p / den)
        .ok_or_else(|| DomainError::Overflow {
            operation: "mul_div_floor".to_string(),
        })
}

/// Common behavior of atom-precision amounts.
///
/// Implemented by every amount newtype so the order book and claim engine
/// can run the same arithmetic on either side of the ledger.
pub trait AtomAmount:
    Copy + Eq + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// The zero amount.
    const ZERO: Self;

    /// Construct from raw atoms.
    fn from_atoms(atoms: u128) -> Self;

    /// Raw atom count.
    fn atoms(&self) -> u128;

    /// Returns true if the amount is zero.
    fn is_zero(&self) -> bool {
        self.atoms() == 0
    }

    /// Checked addition.
    fn checked_add(self, rhs: Self) -> Result<Self, DomainError> {
        self.atoms()
            .checked_add(rhs.atoms())
            .map(Self::from_atoms)
            .ok_or_else(|| DomainError::Overflow {
                operation: "amount addition".to_string(),
            })
    }

    /// Checked subtraction.
    fn checked_sub(self, rhs: Self) -> Result<Self, DomainError> {
        self.atoms()
            .checked_sub(rhs.atoms())
            .map(Self::from_atoms)
            .ok_or_else(|| DomainError::Overflow {
                operation: "amount subtraction".to_string(),
            })
    }

    /// Floor of `self * num / den`, the single rounding primitive of all
    /// pro-rata claim math. Rounds down so residual atoms stay with the
    /// system rather than being overpaid.
    fn mul_div_floor(self, num: u128, den: u128) -> Result<Self, DomainError> {
        mul_div_floor_raw(self.atoms(), num, den).map(Self::from_atoms)
    }
}

macro_rules! define_amount {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u128);

        impl $name {
            /// Create an amount from raw atoms.
            #[must_use]
            pub const fn new(atoms: u128) -> Self {
                Self(atoms)
            }
        }

        impl AtomAmount for $name {
            const ZERO: Self = Self(0);

            fn from_atoms(atoms: u128) -> Self {
                Self(atoms)
            }

            fn atoms(&self) -> u128 {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                <Self as AtomAmount>::ZERO
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u128> for $name {
            fn from(atoms: u128) -> Self {
                Self(atoms)
            }
        }

        impl From<$name> for u128 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_amount!(
    AssetAmount,
    "An amount of a payment asset, in that asset's atoms."
);
define_amount!(
    PoolAmount,
    "An amount of the pool's settlement currency, in pool atoms."
);
define_amount!(ShareAmount, "An amount of share-class tokens, in share atoms.");
