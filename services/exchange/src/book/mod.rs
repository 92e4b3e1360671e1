//! Resting-order storage
//!
//! The order book keeps one price-indexed side per direction plus a
//! cancellation index mapping order id to (side, price, account), so a
//! cancel never scans the book. All mutation goes through the matching
//! engine; the book itself enforces the structural invariants: no empty
//! price level survives a removal, the cached best prices always equal
//! the extremum of the remaining keys, and no fully filled order rests.

mod ask_book;
mod bid_book;
mod condensed;
mod price_level;

pub use ask_book::AskBook;
pub use bid_book::BidBook;
pub use condensed::{CondensedLevel, CondensedOrderBook};
pub use price_level::PriceLevel;

use std::collections::BTreeMap;

use tracing::debug;
use types::errors::ExchangeError;
use types::ids::{AccountId, OrderId, Symbol};
use types::numeric::Price;
use types::order::{Order, Side};
use types::quote::Quote;

/// Signal returned by a visit closure: keep iterating the level or stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Continue,
    Stop,
}

/// Where a resting order lives, kept for O(1) cancellation
#[derive(Debug, Clone, Copy)]
struct IndexEntry {
    side: Side,
    price: Price,
    account_id: AccountId,
}

/// The authoritative resting-order store for one instrument
#[derive(Debug, Clone)]
pub struct OrderBook {
    symbol: Symbol,
    bids: BidBook,
    asks: AskBook,
    index: BTreeMap<OrderId, IndexEntry>,
}

impl OrderBook {
    /// Create an empty book for the given instrument
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            bids: BidBook::new(),
            asks: AskBook::new(),
            index: BTreeMap::new(),
        }
    }

    /// Rest a limit order at its limit price and register it in the
    /// cancellation index
    pub fn insert(&mut self, order: Order) -> Result<(), ExchangeError> {
        let Some(price) = order.limit_price() else {
            return Err(ExchangeError::BookInconsistency {
                message: format!("market order {} cannot rest in the book", order.order_id),
            });
        };

        self.index.insert(
            order.order_id,
            IndexEntry {
                side: order.side,
                price,
                account_id: order.account_id,
            },
        );

        match order.side {
            Side::BUY => self.bids.insert(price, order),
            Side::SELL => self.asks.insert(price, order),
        }

        Ok(())
    }

    /// Remove the order identified by (side, price, id)
    ///
    /// Fails if the triple does not resolve to a stored order.
    pub fn remove_by_index(
        &mut self,
        side: Side,
        price: Price,
        order_id: OrderId,
    ) -> Result<Order, ExchangeError> {
        let removed = match side {
            Side::BUY => self.bids.remove(price, order_id),
            Side::SELL => self.asks.remove(price, order_id),
        };

        match removed {
            Some(order) => {
                self.index.remove(&order_id);
                Ok(order)
            }
            None => Err(ExchangeError::OrderNotFound { order_id }),
        }
    }

    /// Cancel a resting order by id alone, via the cancellation index
    pub fn cancel(&mut self, order_id: OrderId) -> Result<Order, ExchangeError> {
        let entry = self
            .index
            .get(&order_id)
            .copied()
            .ok_or(ExchangeError::OrderNotFound { order_id })?;

        debug!(%order_id, price = %entry.price, "removing order from book");
        self.remove_by_index(entry.side, entry.price, order_id)
    }

    /// The cached best bid price
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// The cached best ask price
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Top-of-book snapshot: best prices with their aggregate sizes
    pub fn top_of_book(&self) -> Quote {
        Quote::new(
            self.symbol.clone(),
            self.bids.best_price(),
            self.asks.best_price(),
            self.bids.best_level_quantity(),
            self.asks.best_level_quantity(),
        )
    }

    /// Visit the best price level on the side opposite the taker, in
    /// arrival order
    ///
    /// The visitor receives the level price and a mutable resting order;
    /// orders it consumes entirely are removed from the level and the
    /// cancellation index by the book itself. Returns the removed orders.
    pub fn consume_best(
        &mut self,
        taker_side: Side,
        visit: impl FnMut(Price, &mut Order) -> Visit,
    ) -> Vec<Order> {
        let consumed = match taker_side {
            Side::BUY => self.asks.consume_best(visit),
            Side::SELL => self.bids.consume_best(visit),
        };

        for order in &consumed {
            self.index.remove(&order.order_id);
        }

        consumed
    }

    /// Remove every ask resting strictly below the reference price
    pub fn drain_asks_below(&mut self, reference: Price) -> Vec<Order> {
        let drained = self.asks.drain_below(reference);
        for order in &drained {
            self.index.remove(&order.order_id);
        }
        drained
    }

    /// Remove every bid resting strictly above the reference price
    pub fn drain_bids_above(&mut self, reference: Price) -> Vec<Order> {
        let drained = self.bids.drain_above(reference);
        for order in &drained {
            self.index.remove(&order.order_id);
        }
        drained
    }

    /// Live orders belonging to one account: (id, side, resting price)
    pub fn orders_for_account(&self, account_id: AccountId) -> Vec<(OrderId, Side, Price)> {
        self.index
            .iter()
            .filter(|(_, entry)| entry.account_id == account_id)
            .map(|(order_id, entry)| (*order_id, entry.side, entry.price))
            .collect()
    }

    /// Build the per-level aggregate view
    pub fn condensed(&self) -> CondensedOrderBook {
        CondensedOrderBook::from_sides(self.symbol.clone(), &self.bids, &self.asks)
    }

    /// Number of resting orders across both sides
    pub fn order_count(&self) -> usize {
        self.index.len()
    }

    /// Whether no order rests on either side
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Drop both sides and the cancellation index
    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.index.clear();
    }

    /// The instrument this book belongs to
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }
}
