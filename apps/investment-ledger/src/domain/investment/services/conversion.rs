//! Unit conversion between asset, pool and share denominations.
//!
//! All conversions go through `Decimal` with an explicit floor to atoms.
//! Rounding therefore happens exactly once per conversion, and always down,
//! so converted totals never exceed their source value.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use crate::domain::shared::{
    AssetAmount, AtomAmount, Decimals, DomainError, PoolAmount, Price, ShareAmount,
};

fn to_decimal(atoms: u128, operation: &str) -> Result<Decimal, DomainError> {
    Decimal::from_u128(atoms).ok_or_else(|| DomainError::Overflow {
        operation: operation.to_string(),
    })
}

fn floor_to_atoms(value: Decimal, operation: &str) -> Result<u128, DomainError> {
    if value < Decimal::ZERO {
        return Err(DomainError::InvalidValue {
            field: "amount".to_string(),
            message: "conversion produced a negative amount".to_string(),
        });
    }
    value.floor().to_u128().ok_or_else(|| DomainError::Overflow {
        operation: operation.to_string(),
    })
}

/// Convert asset atoms to pool atoms at the given asset/pool price.
///
/// `atoms * price * 10^pool_dec / 10^asset_dec`, floored.
///
/// # Errors
///
/// Returns error on overflow or a negative result.
pub fn asset_to_pool(
    amount: AssetAmount,
    price: Price,
    asset_dec: Decimals,
    pool_dec: Decimals,
) -> Result<PoolAmount, DomainError> {
    let units = to_decimal(amount.atoms(), "asset_to_pool")? / asset_dec.atoms_per_unit();
    let pool_units = units * price.rate();
    let atoms = floor_to_atoms(pool_units * pool_dec.atoms_per_unit(), "asset_to_pool")?;
    Ok(PoolAmount::new(atoms))
}

/// Convert pool atoms back to asset atoms at the given asset/pool price.
///
/// Division by the price is expressed as multiplication with its
/// reciprocal, matching the issuance rounding rule.
///
/// # Errors
///
/// Returns error if the price is zero, or on overflow.
pub fn pool_to_asset(
    amount: PoolAmount,
    price: Price,
    asset_dec: Decimals,
    pool_dec: Decimals,
) -> Result<AssetAmount, DomainError> {
    let units = to_decimal(amount.atoms(), "pool_to_asset")? / pool_dec.atoms_per_unit();
    let asset_units = units * price.reciprocal()?.rate();
    let atoms = floor_to_atoms(asset_units * asset_dec.atoms_per_unit(), "pool_to_asset")?;
    Ok(AssetAmount::new(atoms))
}

/// Convert pool atoms to share atoms at the given NAV (pool per share).
///
/// Shares carry the pool's precision, so this reduces to a floored
/// multiplication with the reciprocal NAV.
///
/// # Errors
///
/// Returns error if the NAV is zero, or on overflow.
pub fn pool_to_shares(amount: PoolAmount, nav: Price) -> Result<ShareAmount, DomainError> {
    let value = to_decimal(amount.atoms(), "pool_to_shares")?;
    let shares = value * nav.reciprocal()?.rate();
    let atoms = floor_to_atoms(shares, "pool_to_shares")?;
    Ok(ShareAmount::new(atoms))
}

/// Convert share atoms to pool atoms at the given NAV (pool per share).
///
/// # Errors
///
/// Returns error on overflow.
pub fn shares_to_pool(amount: ShareAmount, nav: Price) -> Result<PoolAmount, DomainError> {
    let value = to_decimal(amount.atoms(), "shares_to_pool")?;
    let atoms = floor_to_atoms(value * nav.rate(), "shares_to_pool")?;
    Ok(PoolAmount::new(atoms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn dec6() -> Decimals {
        Decimals::new(6).unwrap()
    }

    #[test]
    fn asset_to_pool_same_precision() {
        // 20 units at price 10 and 8 units at price 6.25 total 250 pool units
        let a = asset_to_pool(
            AssetAmount::new(20_000_000),
            Price::from_i64(10),
            dec6(),
            dec6(),
        )
        .unwrap();
        let b = asset_to_pool(
            AssetAmount::new(8_000_000),
            Price::new(dec!(6.25)),
            dec6(),
            dec6(),
        )
        .unwrap();
        assert_eq!(a, PoolAmount::new(200_000_000));
        assert_eq!(b, PoolAmount::new(50_000_000));
        assert_eq!(a.checked_add(b).unwrap(), PoolAmount::new(250_000_000));
    }

    #[test]
    fn asset_to_pool_rescales_precision() {
        // 1.5 units of an 8-decimal asset at price 2 into a 6-decimal pool
        let got = asset_to_pool(
            AssetAmount::new(150_000_000),
            Price::from_i64(2),
            Decimals::new(8).unwrap(),
            dec6(),
        )
        .unwrap();
        assert_eq!(got, PoolAmount::new(3_000_000));
    }

    #[test]
    fn pool_to_asset_inverts_at_same_price() {
        let pool = asset_to_pool(
            AssetAmount::new(8_000_000),
            Price::new(dec!(6.25)),
            dec6(),
            dec6(),
        )
        .unwrap();
        let back = pool_to_asset(pool, Price::new(dec!(6.25)), dec6(), dec6()).unwrap();
        assert_eq!(back, AssetAmount::new(8_000_000));
    }

    #[test]
    fn pool_to_shares_floors_by_reciprocal() {
        // 100 / 1.1 = 90.909..., floored to 90
        let shares = pool_to_shares(PoolAmount::new(100), Price::new(dec!(1.1))).unwrap();
        assert_eq!(shares, ShareAmount::new(90));
    }

    #[test]
    fn pool_to_shares_at_unit_nav_is_identity() {
        let shares = pool_to_shares(PoolAmount::new(250_000_000), Price::ONE).unwrap();
        assert_eq!(shares, ShareAmount::new(250_000_000));
    }

    #[test]
    fn shares_to_pool_floors() {
        let pool = shares_to_pool(ShareAmount::new(3), Price::new(dec!(1.5))).unwrap();
        assert_eq!(pool, PoolAmount::new(4));
    }

    #[test]
    fn zero_price_is_rejected() {
        assert!(pool_to_shares(PoolAmount::new(1), Price::ZERO).is_err());
        assert!(pool_to_asset(PoolAmount::new(1), Price::ZERO, dec6(), dec6()).is_err());
    }
}
