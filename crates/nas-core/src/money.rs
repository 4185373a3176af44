//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Single Currency, Integer Units
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The establishment bills in Malagasy ariary (MGA).                      │
//! │                                                                         │
//! │  Prices are whole ariary in practice: 15 000 Ar, 80 000 Ar.            │
//! │  Money stores an i64 count of the smallest unit, so                    │
//! │    3 × 15 000 Ar = 45 000 Ar     (exact, no float drift)               │
//! │                                                                         │
//! │  No tax handling, no currency conversion.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use nas_core::money::Money;
//!
//! let lunch = Money::from_units(15_000);
//! let line = lunch.multiply_quantity(3);
//! assert_eq!(line.units(), 45_000);
//! assert_eq!(line.to_string(), "45 000 Ar");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// Currency code used throughout the establishment.
pub const CURRENCY_CODE: &str = "MGA";

/// Currency symbol appended when formatting.
pub const CURRENCY_SYMBOL: &str = "Ar";

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest unit of the establishment currency.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Room.base_rate ─────────► Lodging invoice line (nights × rate)         │
/// │                                                                         │
/// │  MenuItem.price ──┬──────► Order line (qty × price) ──► End of service  │
/// │                   └──────► Variant price (price + delta)                │
/// │                                                                         │
/// │  InvoiceLine.unit_price ─► Invoice.total ──► Financial summary          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from currency units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in currency units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (price deltas may be).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use nas_core::money::Money;
    ///
    /// let night = Money::from_units(80_000);
    /// assert_eq!(night.multiply_quantity(2).units(), 160_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Formats with a space every three digits and the currency symbol:
/// `1234567` → `1 234 567 Ar`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(c);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{} {}", sign, grouped, CURRENCY_SYMBOL)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_units(0).to_string(), "0 Ar");
        assert_eq!(Money::from_units(999).to_string(), "999 Ar");
        assert_eq!(Money::from_units(1_000).to_string(), "1 000 Ar");
        assert_eq!(Money::from_units(45_000).to_string(), "45 000 Ar");
        assert_eq!(Money::from_units(1_234_567).to_string(), "1 234 567 Ar");
        assert_eq!(Money::from_units(-3_000).to_string(), "-3 000 Ar");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(10_000);
        let b = Money::from_units(2_500);

        assert_eq!((a + b).units(), 12_500);
        assert_eq!((a - b).units(), 7_500);
        assert_eq!((a * 3).units(), 30_000);

        let mut c = a;
        c += b;
        c -= Money::from_units(500);
        assert_eq!(c.units(), 12_000);
    }

    #[test]
    fn test_sum() {
        let values = [Money::from_units(1), Money::from_units(2), Money::from_units(3)];
        let total: Money = values.iter().sum();
        assert_eq!(total.units(), 6);

        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_zero_and_sign() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_negative());
        assert!(Money::from_units(-1).is_negative());
        assert_eq!(Money::default(), Money::zero());
    }
}
