//! Transaction fee schedule
//!
//! The engine charges a flat fraction of notional per leg; both legs of a
//! match pay the same fee. The computed fee is carried back to callers in
//! order and trade metadata under [`TRANSACTION_FEE_KEY`].

use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Metadata key under which the per-leg transaction fee is recorded
pub const TRANSACTION_FEE_KEY: &str = "transaction_fee";

/// Per-leg fee configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fraction of notional charged per leg, e.g. 0.0005 for 5 bps
    pub rate: Decimal,
}

impl FeeSchedule {
    /// Create a schedule with the given per-leg rate
    pub fn new(rate: Decimal) -> Self {
        Self { rate }
    }

    /// A schedule that charges nothing
    pub fn free() -> Self {
        Self {
            rate: Decimal::ZERO,
        }
    }

    /// Fee for one leg: price × quantity × rate
    pub fn transaction_fee(&self, price: Price, quantity: Quantity) -> Decimal {
        price.as_decimal() * quantity.as_decimal() * self.rate
    }
}
