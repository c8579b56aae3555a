//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Storefront pricing takes 10% and then 15% of cent amounts, so a line   │
//! │  can legitimately carry sub-cent digits:                                │
//! │    44.99 × 3 = 134.97 → discount 13.497 → tax 18.22095                  │
//! │                                                                         │
//! │  OUR SOLUTION: exact base-10 decimals                                   │
//! │    Accumulate every line at full precision, round to cents ONCE when   │
//! │    the invoice is stored or a value is displayed.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cirrus_core::money::Money;
//!
//! let price = Money::from_cents(4499); // $44.99
//! let line = price.multiply_quantity(3);
//! assert_eq!(line, Money::from_cents(13497));
//! assert_eq!(line.to_string(), "$134.97");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ValidationError;

/// Number of decimal places money is rounded to for display and storage.
pub const CENT_PLACES: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount held as an exact decimal.
///
/// ## User Workflow Context
/// ```text
/// Product.price ──► CartLine.price ──► LineCalculation ──► CartTotals
///                                                              │
///                            Invoice (rounded to cents) ◄──────┘
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ```rust
    /// use cirrus_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(4499).to_string(), "$44.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, CENT_PLACES))
    }

    /// Wraps an existing decimal amount without rounding.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the underlying decimal at full precision.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use cirrus_core::money::Money;
    ///
    /// let line_total = Money::from_cents(5000).multiply_quantity(3);
    /// assert_eq!(line_total, Money::from_cents(15000));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Returns `bps` basis points of this amount, exactly (1000 bps = 10%).
    ///
    /// No rounding happens here: 15% of $134.97 is $20.2455.
    ///
    /// ```rust
    /// use cirrus_core::money::Money;
    ///
    /// let tax = Money::from_cents(13500).percentage(1500);
    /// assert_eq!(tax, Money::from_cents(2025));
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        Money(self.0 * Decimal::new(i64::from(bps), 4))
    }

    /// Rounds to whole cents, halves away from zero.
    ///
    /// This is the only place precision is dropped.
    pub fn round_cents(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Returns the value, or zero if it is negative.
    pub fn max_zero(self) -> Money {
        if self.is_negative() {
            Money::zero()
        } else {
            self
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Displays the amount rounded to cents with a dollar sign.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rounded = self.round_cents().0;
        rounded.rescale(CENT_PLACES);
        let sign = if rounded < Decimal::ZERO { "-" } else { "" };
        write!(f, "{}${}", sign, rounded.abs())
    }
}

/// Parses user input such as `160`, `44.99` or `$44.99`.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
        Decimal::from_str(digits)
            .map(Money)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: format!("'{}' is not a monetary amount", s),
            })
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
