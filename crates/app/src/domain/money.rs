//! Monetary amounts in minor currency units.

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use thiserror::Error;

/// Minor units per major unit (cents per currency unit).
pub const MINOR_UNITS_PER_MAJOR: u64 = 100;

/// A price in minor currency units. Always positive.
///
/// Stored as an integer to avoid floating-point rounding; the only
/// fractional representation is the exact scale-2 [`Decimal`] used on the
/// payment gateway wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("price must be positive")]
    NotPositive,

    #[error("price exceeds the supported range")]
    OutOfRange,

    #[error("price has sub-minor-unit precision")]
    Precision,
}

impl Price {
    /// Construct a price from minor units.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] for zero and
    /// [`PriceError::OutOfRange`] for values that do not fit the storage
    /// column.
    pub fn from_minor(minor: u64) -> Result<Self, PriceError> {
        if minor == 0 {
            return Err(PriceError::NotPositive);
        }

        if i64::try_from(minor).is_err() {
            return Err(PriceError::OutOfRange);
        }

        Ok(Self(minor))
    }

    #[must_use]
    pub const fn minor_units(self) -> u64 {
        self.0
    }

    /// The amount in major units as an exact scale-2 decimal (`150000` minor
    /// becomes `1500.00`).
    #[must_use]
    pub fn to_major(self) -> Decimal {
        // The constructor guarantees the value fits in i64.
        Decimal::new(i64::try_from(self.0).unwrap_or(i64::MAX), 2)
    }

    /// Reconstruct a price from a major-unit decimal.
    ///
    /// # Errors
    ///
    /// Rejects amounts with more than two decimal places rather than
    /// rounding, so minor → major → minor round-trips exactly.
    pub fn from_major(major: Decimal) -> Result<Self, PriceError> {
        let minor = major
            .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
            .ok_or(PriceError::OutOfRange)?;

        if !minor.is_integer() {
            return Err(PriceError::Precision);
        }

        let minor = minor.to_u64().ok_or(PriceError::OutOfRange)?;

        Self::from_minor(minor)
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.to_major(), f)
    }
}
