//! Money Conversion Module
//!
//! Balances and ledger amounts are `Decimal` values in major currency units
//! (naira, dollars) with at most [`MINOR_DECIMALS`] fractional digits. The
//! payment gateway speaks integer minor units (kobo, cents). All conversions
//! between the two MUST go through this module.
//!
//! ```rust
//! use paylink::money::{from_minor, to_minor};
//! use rust_decimal::Decimal;
//!
//! let major = from_minor(50_000);
//! assert_eq!(major, Decimal::new(500_00, 2));
//! assert_eq!(to_minor(major).unwrap(), 50_000);
//! ```

use rust_decimal::prelude::*;
use thiserror::Error;

/// Fractional digits of the minor unit (1 major = 100 minor).
pub const MINOR_DECIMALS: u32 = 2;

/// Money validation and conversion errors
#[derive(Debug, Error, PartialEq)]
pub enum MoneyError {
    #[error("Amount must be positive")]
    NotPositive,

    #[error("Amount has more than {max} decimal places")]
    PrecisionOverflow { max: u32 },

    #[error("Amount exceeds the maximum of {max}")]
    TooLarge { max: Decimal },

    #[error("Amount too large, would overflow")]
    Overflow,
}

/// Inclusive bounds applied to every transfer and funding amount.
#[derive(Debug, Clone, Copy)]
pub struct AmountLimits {
    pub min: Decimal,
    pub max: Decimal,
}

impl AmountLimits {
    pub fn new(max: Decimal) -> Self {
        Self {
            min: Decimal::new(1, MINOR_DECIMALS),
            max,
        }
    }

    /// Check sign, precision and range. Returns the amount normalized to
    /// exactly two decimal places.
    pub fn check(&self, amount: Decimal) -> Result<Decimal, MoneyError> {
        if amount <= Decimal::ZERO {
            return Err(MoneyError::NotPositive);
        }
        if amount.normalize().scale() > MINOR_DECIMALS {
            return Err(MoneyError::PrecisionOverflow {
                max: MINOR_DECIMALS,
            });
        }
        if amount < self.min {
            return Err(MoneyError::NotPositive);
        }
        if amount > self.max {
            return Err(MoneyError::TooLarge { max: self.max });
        }
        let mut normalized = amount;
        normalized.rescale(MINOR_DECIMALS);
        Ok(normalized)
    }
}

impl Default for AmountLimits {
    fn default() -> Self {
        Self::new(Decimal::new(10_000_000, 0))
    }
}

/// Convert gateway minor units to a major-unit amount.
pub fn from_minor(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_DECIMALS)
}

/// Convert a major-unit amount to gateway minor units.
///
/// Fails when the amount carries sub-minor precision or does not fit in `i64`.
pub fn to_minor(amount: Decimal) -> Result<i64, MoneyError> {
    if amount.normalize().scale() > MINOR_DECIMALS {
        return Err(MoneyError::PrecisionOverflow {
            max: MINOR_DECIMALS,
        });
    }
    let scaled = amount
        .checked_mul(Decimal::from(10i64.pow(MINOR_DECIMALS)))
        .ok_or(MoneyError::Overflow)?;
    scaled.to_i64().ok_or(MoneyError::Overflow)
}
