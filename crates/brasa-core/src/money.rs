//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The storefront backend sends prices as JSON numbers or strings:        │
//! │    { "price": 24.9 }   { "additional_price": "3,50" }                   │
//! │                                                                         │
//! │  Summing those as floats drifts:                                        │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    Every amount is converted ONCE at the wire boundary                  │
//! │    (`Money::from_wire`) and all arithmetic after that is integer.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use brasa_core::money::Money;
//!
//! let burger = Money::from_cents(2490); // R$ 24,90
//! let doubled = burger * 2;             // R$ 49,80
//! let total = doubled + Money::from_cents(350);
//! assert_eq!(total.cents(), 5330);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos for BRL).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values survive arithmetic, but prices shown to
///   the customer are clamped with [`Money::non_negative`]
/// - **Single field tuple struct**: zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ```rust
    /// use brasa_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a backend amount into Money.
    ///
    /// This is the only place a decimal amount becomes integer centavos.
    ///
    /// ## Accepted Shapes
    /// ```text
    /// 24        → 2400     (integer reais)
    /// 24.9      → 2490     (decimal reais, rounded half away from zero)
    /// "24.90"   → 2490
    /// "24,90"   → 2490     (comma decimal separator)
    /// "1.234,50"→ 123450   (dot thousands + comma decimal)
    /// "abc"     → None     (NaN)
    /// null      → None
    /// ```
    ///
    /// ```rust
    /// use brasa_core::money::Money;
    /// use serde_json::json;
    ///
    /// assert_eq!(Money::from_wire(&json!(3.5)), Some(Money::from_cents(350)));
    /// assert_eq!(Money::from_wire(&json!("3,50")), Some(Money::from_cents(350)));
    /// assert_eq!(Money::from_wire(&json!("n/a")), None);
    /// ```
    pub fn from_wire(value: &Value) -> Option<Money> {
        match value {
            Value::Number(n) => {
                if let Some(whole) = n.as_i64() {
                    return whole.checked_mul(100).map(Money);
                }
                n.as_f64().and_then(Self::from_major_f64)
            }
            Value::String(s) => parse_decimal(s).and_then(Self::from_major_f64),
            _ => None,
        }
    }

    fn from_major_f64(major: f64) -> Option<Money> {
        if !major.is_finite() {
            return None;
        }
        let cents = (major * 100.0).round();
        if cents.abs() > i64::MAX as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole reais portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Clamps negative amounts to zero.
    ///
    /// ```rust
    /// use brasa_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-500).non_negative(), Money::zero());
    /// assert_eq!(Money::from_cents(500).non_negative().cents(), 500);
    /// ```
    #[inline]
    pub const fn non_negative(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Multiplies by a quantity, saturating instead of overflowing.
    ///
    /// ```rust
    /// use brasa_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

/// Parses "24.90", "24,90" and "1.234,50" style strings.
fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_start_matches("R$").trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };

    normalized.parse::<f64>().ok()
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `R$ 12,34`. Screens should use the configured formatter.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}R$ {},{:02}",
            sign,
            self.reais().abs(),
            self.cents_part()
        )
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
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
    use serde_json::json;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.reais(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "R$ 10,99");
        assert_eq!(Money::from_cents(500).to_string(), "R$ 5,00");
        assert_eq!(Money::from_cents(-550).to_string(), "-R$ 5,50");
        assert_eq!(Money::zero().to_string(), "R$ 0,00");
    }

    #[test]
    fn test_from_wire_numbers() {
        assert_eq!(Money::from_wire(&json!(24)), Some(Money::from_cents(2400)));
        assert_eq!(Money::from_wire(&json!(24.9)), Some(Money::from_cents(2490)));
        assert_eq!(Money::from_wire(&json!(0.1)), Some(Money::from_cents(10)));
        assert_eq!(Money::from_wire(&json!(-2.5)), Some(Money::from_cents(-250)));
    }

    #[test]
    fn test_from_wire_strings() {
        assert_eq!(Money::from_wire(&json!("24.90")), Some(Money::from_cents(2490)));
        assert_eq!(Money::from_wire(&json!("24,90")), Some(Money::from_cents(2490)));
        assert_eq!(Money::from_wire(&json!("1.234,50")), Some(Money::from_cents(123450)));
        assert_eq!(Money::from_wire(&json!("R$ 7,00")), Some(Money::from_cents(700)));
        assert_eq!(Money::from_wire(&json!(" 3 ")), Some(Money::from_cents(300)));
    }

    #[test]
    fn test_from_wire_rejects_garbage() {
        assert_eq!(Money::from_wire(&json!("")), None);
        assert_eq!(Money::from_wire(&json!("abc")), None);
        assert_eq!(Money::from_wire(&json!("NaN")), None);
        assert_eq!(Money::from_wire(&json!(null)), None);
        assert_eq!(Money::from_wire(&json!(true)), None);
        assert_eq!(Money::from_wire(&json!({"amount": 3})), None);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
    }

    #[test]
    fn test_sum() {
        let lines = [Money::from_cents(100), Money::from_cents(250)];
        let total: Money = lines.iter().sum();
        assert_eq!(total.cents(), 350);

        let empty: Vec<Money> = Vec::new();
        assert_eq!(empty.into_iter().sum::<Money>(), Money::zero());
    }

    #[test]
    fn test_saturation() {
        let huge = Money::from_cents(i64::MAX);
        assert_eq!((huge + Money::from_cents(1)).cents(), i64::MAX);
        assert_eq!(huge.multiply_quantity(2).cents(), i64::MAX);
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
        assert_eq!(Money::from_cents(-100).non_negative(), Money::zero());
    }
}
