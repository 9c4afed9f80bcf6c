//! Cart quantities and product stock levels.
//!
//! A cart line always holds at least one unit: removal is the only way to
//! eliminate an item. Stock is any non-negative count. Both decode from JSON
//! integers or integral strings and reject out-of-range values.

use core::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when building a [`Quantity`] or [`Stock`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Cart quantities start at one.
    #[error("quantity must be at least 1 (got {0})")]
    BelowOne(i64),
    /// Stock cannot go below zero.
    #[error("stock cannot be negative (got {0})")]
    NegativeStock(i64),
    /// The value does not fit.
    #[error("value out of range: {0}")]
    OutOfRange(i64),
}

/// Number of units of one product in a cart (always ≥ 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(1);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::BelowOne`] for zero or negative values.
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value < 1 {
            return Err(QuantityError::BelowOne(value));
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| QuantityError::OutOfRange(value))
    }

    /// The raw count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// One more unit.
    #[must_use]
    pub const fn incremented(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// One fewer unit, or `None` when already at the floor of 1.
    #[must_use]
    pub const fn decremented(&self) -> Option<Self> {
        if self.0 > 1 { Some(Self(self.0 - 1)) } else { None }
    }

    /// Whether this is the smallest allowed quantity.
    #[must_use]
    pub const fn is_one(&self) -> bool {
        self.0 == 1
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl core::str::FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<i64>().map_err(|_| QuantityError::BelowOne(0))?;
        Self::new(value)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = deserializer.deserialize_any(IntegerVisitor)?;
        Self::new(value).map_err(de::Error::custom)
    }
}

/// Units of a product available for sale (always ≥ 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Stock(u32);

impl Stock {
    /// Stock level that counts as comfortably in stock.
    pub const LOW_THRESHOLD: u32 = 10;

    /// Create a stock level.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NegativeStock`] for negative values.
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value < 0 {
            return Err(QuantityError::NegativeStock(value));
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| QuantityError::OutOfRange(value))
    }

    /// The raw count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Whether nothing is left to sell.
    #[must_use]
    pub const fn is_out(&self) -> bool {
        self.0 == 0
    }

    /// Whether stock is positive but at or under [`Stock::LOW_THRESHOLD`].
    #[must_use]
    pub const fn is_low(&self) -> bool {
        self.0 > 0 && self.0 <= Self::LOW_THRESHOLD
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Stock {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<u32> for Stock {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for Stock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = deserializer.deserialize_any(IntegerVisitor)?;
        Self::new(value).map_err(de::Error::custom)
    }
}

/// Accepts JSON integers, integral floats and integral strings.
struct IntegerVisitor;

impl Visitor<'_> for IntegerVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or integral string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(E::custom)
    }

    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)] // checked by the fract/range test
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        if v.fract() == 0.0 && v.abs() < 9.0e15 {
            Ok(v as i64)
        } else {
            Err(E::custom(format!("expected a whole number, got {v}")))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        v.trim().parse::<i64>().map_err(E::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_floor() {
        assert_eq!(Quantity::new(0), Err(QuantityError::BelowOne(0)));
        assert_eq!(Quantity::new(-2), Err(QuantityError::BelowOne(-2)));
        assert_eq!(Quantity::new(1).unwrap(), Quantity::ONE);
    }

    #[test]
    fn test_quantity_step() {
        let two = Quantity::new(2).unwrap();
        assert_eq!(two.incremented().get(), 3);
        assert_eq!(two.decremented(), Some(Quantity::ONE));
        assert_eq!(Quantity::ONE.decremented(), None);
        assert!(Quantity::ONE.is_one());
    }

    #[test]
    fn test_quantity_decodes_strictly() {
        assert_eq!(serde_json::from_str::<Quantity>("3").unwrap().get(), 3);
        assert_eq!(serde_json::from_str::<Quantity>("\"4\"").unwrap().get(), 4);
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert!(serde_json::from_str::<Quantity>("1.5").is_err());
    }

    #[test]
    fn test_stock_decodes_strictly() {
        assert!(serde_json::from_str::<Stock>("0").unwrap().is_out());
        assert_eq!(serde_json::from_str::<Stock>("5.0").unwrap().get(), 5);
        assert!(serde_json::from_str::<Stock>("-1").is_err());
    }

    #[test]
    fn test_stock_levels() {
        assert!(Stock::from(0).is_out());
        assert!(Stock::from(10).is_low());
        assert!(!Stock::from(11).is_low());
        assert!(!Stock::from(0).is_low());
    }
}
