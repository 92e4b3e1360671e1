//! Price level implementation with FIFO queue
//!
//! A price level contains all orders resting at a specific price, in
//! arrival order. Because order ids increase with arrival, FIFO order and
//! ascending-id order are the same thing; this is what price-time priority
//! rests on.

use std::collections::VecDeque;
use types::ids::OrderId;
use types::numeric::Quantity;
use types::order::Order;

/// A price level containing orders at a specific price
///
/// Maintains strict FIFO ordering and a cached total of the remaining
/// quantity across the queue.
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    /// Queue of resting orders (FIFO order)
    orders: VecDeque<Order>,
    /// Total remaining quantity at this level
    total_quantity: Quantity,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new() -> Self {
        Self {
            orders: VecDeque::new(),
            total_quantity: Quantity::zero(),
        }
    }

    /// Append an order at the back of the queue (time priority)
    pub fn push_back(&mut self, order: Order) {
        self.total_quantity = self.total_quantity + order.remaining_quantity;
        self.orders.push_back(order);
    }

    /// Remove an order from the queue by id
    ///
    /// Returns the removed order, or None if it is not at this level.
    pub fn remove(&mut self, order_id: OrderId) -> Option<Order> {
        let position = self
            .orders
            .iter()
            .position(|order| order.order_id == order_id)?;
        self.remove_at(position)
    }

    /// Remove the order at a queue position
    pub fn remove_at(&mut self, position: usize) -> Option<Order> {
        let order = self.orders.remove(position)?;
        self.total_quantity = self.total_quantity.saturating_sub(order.remaining_quantity);
        Some(order)
    }

    /// Mutable access to the order at a queue position
    pub fn get_mut(&mut self, position: usize) -> Option<&mut Order> {
        self.orders.get_mut(position)
    }

    /// Adjust the cached total after an order was consumed in place
    ///
    /// The visit loop mutates resting orders through `get_mut`; it must
    /// report the consumed amount here to keep the cached total honest.
    pub fn note_consumed(&mut self, consumed: Quantity) {
        self.total_quantity = self.total_quantity.saturating_sub(consumed);
    }

    /// Iterate the resting orders in arrival order
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Consume the level, yielding its orders in arrival order
    pub fn into_orders(self) -> impl Iterator<Item = Order> {
        self.orders.into_iter()
    }

    /// Check if the price level is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Get the total remaining quantity at this price level
    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    /// Get the number of orders at this level
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::{AccountId, Symbol};
    use types::numeric::Price;
    use types::order::{OrderRequest, Side};

    fn resting(id: u64, qty: u64) -> Order {
        Order::accepted(
            OrderId::new(id),
            OrderRequest::limit(
                Symbol::new("AA"),
                Side::BUY,
                Price::from_u64(100),
                Quantity::from_u64(qty),
                AccountId::new(),
            ),
        )
    }

    #[test]
    fn test_push_back_tracks_total() {
        let mut level = PriceLevel::new();
        level.push_back(resting(1, 10));
        level.push_back(resting(2, 9));

        assert_eq!(level.order_count(), 2);
        assert_eq!(level.total_quantity(), Quantity::from_u64(19));
        assert!(!level.is_empty());
    }

    #[test]
    fn test_fifo_order() {
        let mut level = PriceLevel::new();
        level.push_back(resting(1, 10));
        level.push_back(resting(2, 9));
        level.push_back(resting(3, 8));

        let ids: Vec<u64> = level.iter().map(|o| o.order_id.as_u64()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_remove_by_id() {
        let mut level = PriceLevel::new();
        level.push_back(resting(1, 10));
        level.push_back(resting(2, 9));

        let removed = level.remove(OrderId::new(1)).unwrap();
        assert_eq!(removed.order_id, OrderId::new(1));
        assert_eq!(level.order_count(), 1);
        assert_eq!(level.total_quantity(), Quantity::from_u64(9));

        assert!(level.remove(OrderId::new(1)).is_none());
    }

    #[test]
    fn test_note_consumed_keeps_total_honest() {
        let mut level = PriceLevel::new();
        level.push_back(resting(1, 10));

        if let Some(order) = level.get_mut(0) {
            order.fill(Quantity::from_u64(4));
        }
        level.note_consumed(Quantity::from_u64(4));

        assert_eq!(level.total_quantity(), Quantity::from_u64(6));
    }

    #[test]
    fn test_remove_at_after_consumption() {
        let mut level = PriceLevel::new();
        level.push_back(resting(1, 10));
        level.push_back(resting(2, 5));

        if let Some(order) = level.get_mut(0) {
            order.fill(Quantity::from_u64(10));
        }
        level.note_consumed(Quantity::from_u64(10));
        let removed = level.remove_at(0).unwrap();

        assert!(removed.is_filled());
        assert_eq!(level.total_quantity(), Quantity::from_u64(5));
        assert_eq!(level.order_count(), 1);
    }
}
