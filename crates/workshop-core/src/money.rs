//! # Money Module
//!
//! Provides the `Money` and `Quantity` types used by every line item and total.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In the browser:                                                        │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A quotation printed twice must show the same VAT to the cent.          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Integer Thousandths                      │
//! │    unit cost 200.00 → 20000 cents                                       │
//! │    est. time 1.5 h  → 1500 thousandths                                  │
//! │    line total       → 20000 × 1500 / 1000 = 30000 cents                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use workshop_core::money::{Money, Quantity};
//!
//! let unit_cost = Money::parse_lenient("200");
//! let hours = Quantity::parse_lenient("2");
//! assert_eq!(unit_cost.times(hours), Money::from_major(400));
//!
//! // Malformed input never fails, it is zero
//! assert!(Money::parse_lenient("n/a").is_zero());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

use crate::coerce::{div_round_half_away, json_to_number_or_zero, to_number_or_zero};
use crate::types::TaxRate;
use crate::{MONEY_SCALE, QUANTITY_SCALE};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: negative literal input is accepted as-is
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LabourItem.unit_cost ──► LabourItem.total ──┐                          │
/// │  SpareItem.unit_price ──► SpareItem.total ───┼──► Category subtotal     │
/// │  OtherItem.amount ───────────────────────────┘          │               │
/// │                                                         ▼               │
/// │  discount / other_cost ───────────────────────► Summary.gross_total     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use workshop_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Parses raw form input, treating anything non-numeric as zero.
    ///
    /// ## Example
    /// ```rust
    /// use workshop_core::money::Money;
    ///
    /// assert_eq!(Money::parse_lenient("1,250.50").cents(), 125050);
    /// assert_eq!(Money::parse_lenient("").cents(), 0);
    /// assert_eq!(Money::parse_lenient("-5").cents(), -500);
    /// ```
    pub fn parse_lenient(raw: &str) -> Self {
        Money(to_number_or_zero(raw, MONEY_SCALE))
    }

    /// Reads a persisted JSON value (number or numeric string).
    pub fn from_json_lenient(value: &serde_json::Value) -> Self {
        Money(json_to_number_or_zero(value, MONEY_SCALE))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-currency portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Floors the value at zero.
    ///
    /// ## Example
    /// ```rust
    /// use workshop_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-300).clamp_non_negative(), Money::zero());
    /// assert_eq!(Money::from_cents(300).clamp_non_negative().cents(), 300);
    /// ```
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Calculates tax with half-up rounding to the cent.
    ///
    /// ## Implementation
    /// Integer math: `amount_cents * bps / 10000`, rounded half away from
    /// zero, with an i128 intermediate so large subtotals cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use workshop_core::money::Money;
    /// use workshop_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_major(400);
    /// let vat = subtotal.calculate_tax(TaxRate::from_bps(1500)); // 15%
    /// assert_eq!(vat, Money::from_major(60));
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let product = self.0 as i128 * rate.bps() as i128;
        Money(div_round_half_away(product, 10_000))
    }

    /// Multiplies by a fractional quantity, rounding to the cent.
    ///
    /// ## Example
    /// ```rust
    /// use workshop_core::money::{Money, Quantity};
    ///
    /// let rate = Money::from_cents(3333);           // 33.33 per hour
    /// let time = Quantity::from_milli(1500);        // 1.5 hours
    /// assert_eq!(rate.times(time).cents(), 5000);   // 49.995 → 50.00
    /// ```
    pub fn times(&self, qty: Quantity) -> Money {
        let product = self.0 as i128 * qty.milli() as i128;
        Money(div_round_half_away(product, 1_000))
    }

    /// Returns the value in major units as a float, for JSON output only.
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Saturating addition, used when aggregating many rows.
    #[inline]
    pub const fn saturating_add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the plain decimal amount, e.g. "1250.00" or "-5.50".
///
/// ## Note
/// No currency symbol: print templates own presentation.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.cents_part())
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
        self.saturating_add(other)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = self.saturating_add(other);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Money::saturating_add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Quantity Type
// =============================================================================

/// A multiplier (estimated hours, part quantity) in thousandths.
///
/// Three decimals cover the time entries seen in practice (e.g. 0.25 h) and
/// keep `Money × Quantity` exact before the final rounding to the cent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity from thousandths (1500 = 1.5).
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Creates a whole-number quantity.
    #[inline]
    pub const fn from_whole(whole: i64) -> Self {
        Quantity(whole * 1000)
    }

    /// Parses raw form input, treating anything non-numeric as zero.
    pub fn parse_lenient(raw: &str) -> Self {
        Quantity(to_number_or_zero(raw, QUANTITY_SCALE))
    }

    /// Reads a persisted JSON value (number or numeric string).
    pub fn from_json_lenient(value: &serde_json::Value) -> Self {
        Quantity(json_to_number_or_zero(value, QUANTITY_SCALE))
    }

    /// Returns the raw thousandths.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the value as a float, for JSON output only.
    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

/// Display trims trailing zeros: "2", "1.5", "0.125".
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = (self.0 / 1000).abs();
        let frac = (self.0 % 1000).abs();
        if frac == 0 {
            write!(f, "{}{}", sign, whole)
        } else {
            let digits = format!("{:03}", frac);
            write!(f, "{}{}.{}", sign, whole, digits.trim_end_matches('0'))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
