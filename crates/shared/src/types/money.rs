//! Money type with fixed-point precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are stored as a signed count of minor units (cents) so that
//! addition is exact and associative. `rust_decimal::Decimal` is the
//! boundary type for parsing, display and serialization.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors raised when converting into `Money`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The value does not fit in the minor-unit representation.
    #[error("Amount out of range: {0}")]
    OutOfRange(Decimal),

    /// The text is not a decimal number.
    #[error("Invalid amount: {0}")]
    Parse(String),
}

/// A monetary amount in minor units at a fixed scale of two decimal places.
///
/// Positive and negative values are both valid: balances are signed, while
/// facts and transfers enforce positivity at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Number of decimal places carried by every amount.
    pub const SCALE: u32 = 2;

    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// The smallest representable positive amount (one cent).
    pub const MINOR_UNIT: Self = Self(1);

    /// Creates an amount from a count of minor units.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the amount as a count of minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Converts a decimal into money, rounding half-up to the minor unit.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::OutOfRange` if the rounded value overflows.
    pub fn from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        let mut rounded =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::SCALE);
        i64::try_from(rounded.mantissa())
            .map(Self)
            .map_err(|_| MoneyError::OutOfRange(value))
    }

    /// Returns the exact decimal value.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, Self::SCALE)
    }

    /// Returns true if the amount is exactly zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the magnitude does not exceed `tolerance`.
    #[must_use]
    pub const fn is_zero_within(self, tolerance: Self) -> bool {
        self.0.unsigned_abs() <= tolerance.0.unsigned_abs()
    }

    /// Returns true if the amount is strictly greater than zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns true if the amount is strictly less than zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value, saturating at the largest amount.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Adds two amounts, returning `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Subtracts two amounts, returning `None` on overflow.
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Negates the amount, returning `None` on overflow.
    #[must_use]
    pub const fn checked_neg(self) -> Option<Self> {
        match self.0.checked_neg() {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Sums amounts, returning `None` as soon as the running total overflows.
    pub fn checked_sum(amounts: impl IntoIterator<Item = Self>) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, Self::checked_add)
    }

    /// Multiplies by an integer factor, returning `None` on overflow.
    #[must_use]
    pub const fn checked_mul(self, factor: i64) -> Option<Self> {
        match self.0.checked_mul(factor) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Divides the amount into `parts` equal shares.
    ///
    /// Each share is `total / parts` rounded half-up to the minor unit, and
    /// the rounding residue goes to the first share so the shares always sum
    /// to exactly `self`. When that would leave the first share at zero or
    /// with the opposite sign (0.06 over 4 gives 0.00 first), shares are
    /// truncated toward zero instead and the first share takes the remainder.
    /// Returns an empty vector when `parts` is zero.
    ///
    /// ```
    /// use splitledger_shared::types::Money;
    ///
    /// let shares = Money::from_minor(10_000).split_equal(3);
    /// assert_eq!(shares, vec![
    ///     Money::from_minor(3_334),
    ///     Money::from_minor(3_333),
    ///     Money::from_minor(3_333),
    /// ]);
    /// ```
    #[must_use]
    pub fn split_equal(self, parts: usize) -> Vec<Self> {
        let Ok(count) = i128::try_from(parts) else {
            return Vec::new();
        };
        if count == 0 {
            return Vec::new();
        }

        let total = i128::from(self.0);
        let half_up = (2 * total.abs() + count) / (2 * count) * total.signum();
        let first_of = |share: i128| total - share * (count - 1);
        let share = if first_of(half_up).signum() == total.signum() {
            half_up
        } else {
            total / count
        };

        // |share| and |first| never exceed |total|, so both fit in i64.
        let narrow = |minor: i128| i64::try_from(minor).map_or(Self::ZERO, Self);
        let mut shares = vec![narrow(share); parts];
        shares[0] = narrow(first_of(share));
        shares
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| MoneyError::Parse(s.to_string()))?;
        Self::from_decimal(value)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.to_decimal()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.to_decimal(), serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::from_decimal(value).map_err(serde::de::Error::custom)
    }
}
