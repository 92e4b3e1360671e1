//! Top-of-book snapshots
//!
//! A quote is a point-in-time value; it is produced on demand and never
//! stored. Equality over all five fields is what lets the engine suppress
//! duplicate quote publications.

use crate::ids::Symbol;
use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Best bid and ask with their aggregate resting sizes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: Symbol,
    /// Highest resting bid price, absent when the bid side is empty
    pub bid: Option<Price>,
    /// Lowest resting ask price, absent when the ask side is empty
    pub ask: Option<Price>,
    /// Total remaining quantity at the best bid (zero when absent)
    pub bid_size: Quantity,
    /// Total remaining quantity at the best ask (zero when absent)
    pub ask_size: Quantity,
}

impl Quote {
    /// Create a new quote
    pub fn new(
        symbol: Symbol,
        bid: Option<Price>,
        ask: Option<Price>,
        bid_size: Quantity,
        ask_size: Quantity,
    ) -> Self {
        Self {
            symbol,
            bid,
            ask,
            bid_size,
            ask_size,
        }
    }

    /// The quote of an empty book
    pub fn empty(symbol: Symbol) -> Self {
        Self::new(symbol, None, None, Quantity::zero(), Quantity::zero())
    }

    /// Difference between best ask and best bid, when both are present
    pub fn spread(&self) -> Option<Decimal> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some(ask.as_decimal() - bid.as_decimal()),
            _ => None,
        }
    }

    /// Midpoint of best bid and best ask, when both are present
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => {
                Some((bid.as_decimal() + ask.as_decimal()) / Decimal::from(2))
            }
            _ => None,
        }
    }
}
