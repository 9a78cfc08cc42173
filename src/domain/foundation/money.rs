//! Money value object, held in the smallest currency unit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

use super::ValidationError;

/// Non-negative amount in paise (1 rupee = 100 paise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates an amount from paise, rejecting negatives.
    pub fn from_paise(paise: i64) -> Result<Self, ValidationError> {
        if paise < 0 {
            return Err(ValidationError::out_of_range("amount", 0, i64::MAX, paise));
        }
        Ok(Self(paise))
    }

    /// Creates an amount from whole rupees.
    pub const fn from_rupees(rupees: u32) -> Self {
        Self(rupees as i64 * 100)
    }

    /// Parses a rupee amount such as `"12000"` or `"12000.50"`.
    pub fn parse_rupees(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        let invalid = || ValidationError::invalid_format("amount", format!("'{}' is not a rupee amount", raw));

        let (whole, fraction) = match raw.split_once('.') {
            Some((w, f)) => (w, f),
            None => (raw, ""),
        };
        if whole.is_empty() || fraction.len() > 2 {
            return Err(invalid());
        }
        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let fraction: i64 = if fraction.is_empty() {
            0
        } else {
            let digits: i64 = fraction.parse().map_err(|_| invalid())?;
            if fraction.len() == 1 {
                digits * 10
            } else {
                digits
            }
        };
        let paise = whole
            .checked_mul(100)
            .and_then(|p| p.checked_add(fraction))
            .ok_or_else(invalid)?;
        Self::from_paise(paise)
    }

    /// Returns the amount in paise.
    pub fn paise(&self) -> i64 {
        self.0
    }

    /// Returns half the amount, rounding down to the paisa.
    pub fn half(&self) -> Self {
        Self(self.0 / 2)
    }

    /// Applies a percentage discount, rounding down to the paisa.
    pub fn discounted_by(&self, percent: u8) -> Result<Self, ValidationError> {
        if percent > 100 {
            return Err(ValidationError::out_of_range("discount_percent", 0, 100, percent as i64));
        }
        Ok(Self(self.0 * (100 - percent as i64) / 100))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, rhs: u32) -> Money {
        Money(self.0 * rhs as i64)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
