//! Type-safe price representation using decimal arithmetic.
//!
//! The backend is loose about numeric types: the same field may arrive as
//! `9.99` or `"9.99"`. [`Price`] accepts both on the way in and always sends a
//! JSON number on the way out. Negative amounts are rejected at decode time.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Currency symbol used for display.
const CURRENCY_SYMBOL: &str = "₱";

/// Errors that can occur when building a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A non-negative monetary amount in the store currency.
///
/// ## Examples
///
/// ```
/// use shopfront_core::Price;
///
/// let price = Price::parse("1234.5").unwrap();
/// assert_eq!(price.display(), "₱1,234.50");
///
/// assert!(Price::parse("-1").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount.normalize()))
    }

    /// Create a price from an amount in cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `cents` is below zero.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// Parse a price from its decimal string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a number or is negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid(s.to_string()))?;
        Self::new(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Format for display, e.g. `₱1,234.50`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.0.round_dp(2);
        let text = format!("{rounded:.2}");
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        format!("{CURRENCY_SYMBOL}{}.{fraction}", group_thousands(whole))
    }
}

/// Insert comma separators every three digits.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.to_f64() {
            Some(value) => serializer.serialize_f64(value),
            None => Err(serde::ser::Error::custom("price out of range")),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PriceVisitor)
    }
}

struct PriceVisitor;

impl PriceVisitor {
    fn finish<E: de::Error>(amount: Decimal) -> Result<Price, E> {
        Price::new(amount).map_err(E::custom)
    }
}

impl Visitor<'_> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
        Self::finish(Decimal::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
        Self::finish(Decimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
        // The shortest round-trip representation keeps 9.99 as 9.99.
        let amount = Decimal::from_str(&v.to_string()).map_err(E::custom)?;
        Self::finish(amount)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
        Price::parse(v).map_err(E::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_numbers_and_strings() {
        let from_number: Price = serde_json::from_str("9.99").unwrap();
        let from_string: Price = serde_json::from_str("\"9.99\"").unwrap();
        let from_int: Price = serde_json::from_str("12").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.amount(), Decimal::new(999, 2));
        assert_eq!(from_int.amount(), Decimal::from(12));
    }

    #[test]
    fn test_rejects_negative() {
        assert!(serde_json::from_str::<Price>("-0.01").is_err());
        assert!(serde_json::from_str::<Price>("\"-3\"").is_err());
        assert_eq!(Price::parse("-5"), Err(PriceError::Negative));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Price>("\"abc\"").is_err());
        assert!(serde_json::from_str::<Price>("true").is_err());
        assert!(matches!(Price::parse("1.2.3"), Err(PriceError::Invalid(_))));
    }

    #[test]
    fn test_serializes_as_number() {
        let price = Price::parse("9.99").unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "9.99");
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::ZERO.display(), "₱0.00");
        assert_eq!(Price::parse("5").unwrap().display(), "₱5.00");
        assert_eq!(Price::parse("999.999").unwrap().display(), "₱1,000.00");
        assert_eq!(Price::parse("1234567.8").unwrap().display(), "₱1,234,567.80");
        assert_eq!(Price::from_cents(1999).unwrap().to_string(), "₱19.99");
    }
}
