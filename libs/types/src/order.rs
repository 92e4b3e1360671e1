//! Order sides, kinds, requests, and resting orders

use crate::fee::TRANSACTION_FEE_KEY;
use crate::ids::{AccountId, OrderId, Symbol};
use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form metadata attached to orders and trades
///
/// The engine records the computed per-leg transaction fee here; callers
/// may attach their own keys, which are carried through untouched.
pub type Metadata = BTreeMap<String, String>;

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    BUY,
    /// Sell order (ask)
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }
}

/// Order kind
///
/// The limit price lives inside the `Limit` variant, so a priced market
/// order or an unpriced limit order cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "price")]
pub enum OrderKind {
    /// Execute immediately against the opposite side; never rests
    Market,
    /// Execute at the given price or better; the remainder rests
    Limit(Price),
}

impl OrderKind {
    /// The limit price, if this is a limit order
    pub fn limit_price(&self) -> Option<Price> {
        match self {
            OrderKind::Market => None,
            OrderKind::Limit(price) => Some(*price),
        }
    }
}

/// A caller's request to trade, before the engine has accepted it
///
/// Carries no order id; the engine assigns one at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: Symbol,
    pub side: Side,
    pub kind: OrderKind,
    pub quantity: Quantity,
    pub account_id: AccountId,
    #[serde(default)]
    pub metadata: Metadata,
}

impl OrderRequest {
    /// Build a limit order request
    pub fn limit(
        symbol: Symbol,
        side: Side,
        price: Price,
        quantity: Quantity,
        account_id: AccountId,
    ) -> Self {
        Self {
            symbol,
            side,
            kind: OrderKind::Limit(price),
            quantity,
            account_id,
            metadata: Metadata::new(),
        }
    }

    /// Build a market order request
    pub fn market(symbol: Symbol, side: Side, quantity: Quantity, account_id: AccountId) -> Self {
        Self {
            symbol,
            side,
            kind: OrderKind::Market,
            quantity,
            account_id,
            metadata: Metadata::new(),
        }
    }
}

/// An accepted order, resting in the book or in flight during a submit call
///
/// The remaining quantity decreases in place as the order matches; the
/// order is removed from the book on full fill or cancellation. Market
/// orders exist only for the duration of the submit call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub account_id: AccountId,
    pub symbol: Symbol,
    pub side: Side,
    pub kind: OrderKind,
    pub original_quantity: Quantity,
    pub remaining_quantity: Quantity,
    pub metadata: Metadata,
}

impl Order {
    /// Build the engine-internal record for an accepted request
    pub fn accepted(order_id: OrderId, request: OrderRequest) -> Self {
        Self {
            order_id,
            account_id: request.account_id,
            symbol: request.symbol,
            side: request.side,
            kind: request.kind,
            original_quantity: request.quantity,
            remaining_quantity: request.quantity,
            metadata: request.metadata,
        }
    }

    /// The limit price, if this is a limit order
    pub fn limit_price(&self) -> Option<Price> {
        self.kind.limit_price()
    }

    /// Check if the order has no quantity left
    pub fn is_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }

    /// Quantity executed so far
    pub fn filled_quantity(&self) -> Quantity {
        self.original_quantity.saturating_sub(self.remaining_quantity)
    }

    /// Reduce the remaining quantity by an executed fill
    pub fn fill(&mut self, quantity: Quantity) {
        debug_assert!(
            quantity.as_decimal() <= self.remaining_quantity.as_decimal(),
            "fill exceeds remaining quantity"
        );
        self.remaining_quantity = self.remaining_quantity.saturating_sub(quantity);
    }

    /// Record the most recent per-leg transaction fee into the metadata
    pub fn set_transaction_fee(&mut self, fee: Decimal) {
        self.metadata
            .insert(TRANSACTION_FEE_KEY.to_string(), fee.to_string());
    }

    /// The recorded transaction fee, if any
    pub fn transaction_fee(&self) -> Option<Decimal> {
        self.metadata
            .get(TRANSACTION_FEE_KEY)
            .and_then(|raw| Decimal::from_str_exact(raw).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit_request(qty: u64) -> OrderRequest {
        OrderRequest::limit(
            Symbol::new("AA"),
            Side::BUY,
            Price::from_u64(100),
            Quantity::from_u64(qty),
            AccountId::new(),
        )
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::BUY.opposite(), Side::SELL);
        assert_eq!(Side::SELL.opposite(), Side::BUY);
    }

    #[test]
    fn test_kind_limit_price() {
        assert_eq!(OrderKind::Market.limit_price(), None);
        assert_eq!(
            OrderKind::Limit(Price::from_u64(100)).limit_price(),
            Some(Price::from_u64(100))
        );
    }

    #[test]
    fn test_accepted_order() {
        let order = Order::accepted(OrderId::new(1), limit_request(10));
        assert_eq!(order.order_id, OrderId::new(1));
        assert_eq!(order.remaining_quantity, Quantity::from_u64(10));
        assert_eq!(order.original_quantity, Quantity::from_u64(10));
        assert!(!order.is_filled());
    }

    #[test]
    fn test_fill_tracks_quantities() {
        let mut order = Order::accepted(OrderId::new(1), limit_request(10));

        order.fill(Quantity::from_u64(4));
        assert_eq!(order.remaining_quantity, Quantity::from_u64(6));
        assert_eq!(order.filled_quantity(), Quantity::from_u64(4));
        assert!(!order.is_filled());

        order.fill(Quantity::from_u64(6));
        assert!(order.is_filled());
        assert_eq!(order.filled_quantity(), Quantity::from_u64(10));
    }

    #[test]
    fn test_transaction_fee_roundtrip() {
        let mut order = Order::accepted(OrderId::new(1), limit_request(10));
        assert_eq!(order.transaction_fee(), None);

        order.set_transaction_fee(Decimal::new(25, 1));
        assert_eq!(order.transaction_fee(), Some(Decimal::new(25, 1)));
    }

    #[test]
    fn test_market_request_has_no_price() {
        let request = OrderRequest::market(
            Symbol::new("AA"),
            Side::SELL,
            Quantity::from_u64(5),
            AccountId::new(),
        );
        assert_eq!(request.kind.limit_price(), None);
    }

    #[test]
    fn test_order_serialization() {
        let order = Order::accepted(OrderId::new(7), limit_request(3));
        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, back);
    }
}
