//! Fixed-point decimal types for prices and quantities
//!
//! Uses rust_decimal for deterministic arithmetic (no floating-point
//! errors). Construction is deliberately permissive: admission rules such
//! as "limit price must be positive" belong to engine validation, so an
//! invalid value is representable and rejected with a typed error rather
//! than a constructor panic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// A price expressed in quote currency per unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Wrap a raw decimal
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Create from an integer number of quote units
    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Parse from a decimal string, e.g. "100.25"
    pub fn from_str(s: &str) -> Result<Self, rust_decimal::Error> {
        Decimal::from_str_exact(s).map(Self)
    }

    /// Get the inner decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Whether this price is strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A quantity of the traded instrument
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Wrap a raw decimal
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// The zero quantity
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Create from an integer number of units
    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Parse from a decimal string, e.g. "1.5"
    pub fn from_str(s: &str) -> Result<Self, rust_decimal::Error> {
        Decimal::from_str_exact(s).map(Self)
    }

    /// Get the inner decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Whether this quantity is exactly zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Whether this quantity is strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Subtract, clamping at zero
    pub fn saturating_sub(&self, rhs: Quantity) -> Quantity {
        Quantity((self.0 - rhs.0).max(Decimal::ZERO))
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 + rhs.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_ordering() {
        let low = Price::from_u64(99);
        let high = Price::from_u64(101);
        assert!(low < high);
        assert_eq!(low.min(high), low);
    }

    #[test]
    fn test_price_parse() {
        let price = Price::from_str("100.25").unwrap();
        assert_eq!(price.as_decimal(), Decimal::new(10025, 2));
        assert!(Price::from_str("not a price").is_err());
    }

    #[test]
    fn test_price_positivity() {
        assert!(Price::from_u64(1).is_positive());
        assert!(!Price::from_u64(0).is_positive());
        assert!(!Price::new(Decimal::from(-10)).is_positive());
    }

    #[test]
    fn test_quantity_arithmetic() {
        let a = Quantity::from_u64(10);
        let b = Quantity::from_u64(4);
        assert_eq!(a + b, Quantity::from_u64(14));
        assert_eq!(a.saturating_sub(b), Quantity::from_u64(6));
        assert_eq!(b.saturating_sub(a), Quantity::zero());
    }

    #[test]
    fn test_quantity_predicates() {
        assert!(Quantity::zero().is_zero());
        assert!(!Quantity::zero().is_positive());
        assert!(Quantity::from_u64(1).is_positive());
        assert!(!Quantity::new(Decimal::from(-10)).is_positive());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let price = Price::from_str("50000.5").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(price, back);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_saturating_sub_never_negative(a in 0u64..1_000_000, b in 0u64..1_000_000) {
                let result = Quantity::from_u64(a).saturating_sub(Quantity::from_u64(b));
                prop_assert!(result.as_decimal() >= Decimal::ZERO);
            }

            #[test]
            fn prop_price_order_matches_decimal(a in 0u64..1_000_000, b in 0u64..1_000_000) {
                let (pa, pb) = (Price::from_u64(a), Price::from_u64(b));
                prop_assert_eq!(pa < pb, a < b);
            }
        }
    }
}
