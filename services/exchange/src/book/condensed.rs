//! Condensed per-level view of the order book
//!
//! Aggregates each price level into its total resting quantity, without
//! individual order detail. Useful for judging the depth a market order
//! would sweep; the cumulative queries are full scans, which is fine for
//! a diagnostic view off the hot path.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use types::ids::Symbol;
use types::numeric::{Price, Quantity};

use super::ask_book::AskBook;
use super::bid_book::BidBook;

/// One aggregated price level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CondensedLevel {
    pub price: Price,
    pub quantity: Quantity,
}

/// Read-only aggregation of the book into per-price-level size totals
///
/// Rebuilt on demand from the live book; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CondensedOrderBook {
    symbol: Symbol,
    bids: BTreeMap<Price, Quantity>,
    asks: BTreeMap<Price, Quantity>,
}

impl CondensedOrderBook {
    /// Aggregate the two live sides into level totals
    pub(crate) fn from_sides(symbol: Symbol, bids: &BidBook, asks: &AskBook) -> Self {
        Self {
            symbol,
            bids: bids
                .levels()
                .map(|(price, level)| (*price, level.total_quantity()))
                .collect(),
            asks: asks
                .levels()
                .map(|(price, level)| (*price, level.total_quantity()))
                .collect(),
        }
    }

    /// Total ask quantity resting at or below the price threshold
    pub fn ask_quantity_at_or_below(&self, price: Price) -> Quantity {
        self.asks
            .range(..=price)
            .fold(Quantity::zero(), |sum, (_, quantity)| sum + *quantity)
    }

    /// Total bid quantity resting at or above the price threshold
    pub fn bid_quantity_at_or_above(&self, price: Price) -> Quantity {
        self.bids
            .range(price..)
            .fold(Quantity::zero(), |sum, (_, quantity)| sum + *quantity)
    }

    /// Bid levels, best (highest price) first
    pub fn bid_levels(&self) -> Vec<CondensedLevel> {
        self.bids
            .iter()
            .rev()
            .map(|(price, quantity)| CondensedLevel {
                price: *price,
                quantity: *quantity,
            })
            .collect()
    }

    /// Ask levels, best (lowest price) first
    pub fn ask_levels(&self) -> Vec<CondensedLevel> {
        self.asks
            .iter()
            .map(|(price, quantity)| CondensedLevel {
                price: *price,
                quantity: *quantity,
            })
            .collect()
    }

    /// Whether both sides are empty
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// The instrument this view belongs to
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }
}
