//! Trade, quote, and trade-price publication
//!
//! Each engine owns its listener registries, keyed by account id; there is
//! no process-wide listener state. A listener is either a direct callback
//! (invoked synchronously, with panics contained to that one delivery) or
//! a bounded channel with an explicit overflow policy, so a slow consumer
//! can never stall matching. A missing listener is a delivery miss for
//! that account, not an engine error, and a failed delivery never rolls
//! back a completed match.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{debug, warn};
use types::ids::AccountId;
use types::numeric::Price;
use types::quote::Quote;
use types::trade::Trade;

/// What to do when a bounded subscription's queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryPolicy {
    /// Wait for the subscriber to drain the queue
    Block,
    /// Drop the newest message and log the miss
    DropNewest,
}

/// One registered delivery endpoint
enum Sink<T> {
    Callback(Box<dyn FnMut(&T) + Send>),
    Channel {
        tx: Sender<T>,
        policy: DeliveryPolicy,
    },
}

impl<T: Clone> Sink<T> {
    fn deliver(&mut self, value: &T, stream: &'static str, account_id: AccountId) {
        match self {
            Sink::Callback(callback) => {
                if catch_unwind(AssertUnwindSafe(|| callback(value))).is_err() {
                    warn!(
                        %account_id,
                        stream,
                        "listener panicked during delivery; other deliveries unaffected"
                    );
                }
            }
            Sink::Channel { tx, policy } => match policy {
                DeliveryPolicy::Block => {
                    if tx.send(value.clone()).is_err() {
                        warn!(%account_id, stream, "subscriber disconnected, dropping message");
                    }
                }
                DeliveryPolicy::DropNewest => match tx.try_send(value.clone()) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        warn!(%account_id, stream, "subscriber queue full, dropping message");
                    }
                    Err(TrySendError::Disconnected(_)) => {
                        warn!(%account_id, stream, "subscriber disconnected, dropping message");
                    }
                },
            },
        }
    }
}

/// Per-engine listener registries
#[derive(Default)]
pub struct Publisher {
    trade_sinks: BTreeMap<AccountId, Sink<Trade>>,
    quote_sinks: BTreeMap<AccountId, Sink<Quote>>,
    price_sinks: BTreeMap<AccountId, Sink<Price>>,
}

impl Publisher {
    /// Create an empty publisher
    pub fn new() -> Self {
        Self {
            trade_sinks: BTreeMap::new(),
            quote_sinks: BTreeMap::new(),
            price_sinks: BTreeMap::new(),
        }
    }

    /// Register a synchronous trade callback for an account
    pub fn register_trade_listener(
        &mut self,
        account_id: AccountId,
        callback: impl FnMut(&Trade) + Send + 'static,
    ) {
        debug!(%account_id, "registering trade listener");
        self.trade_sinks
            .insert(account_id, Sink::Callback(Box::new(callback)));
    }

    /// Register a bounded trade subscription for an account
    pub fn subscribe_trades(
        &mut self,
        account_id: AccountId,
        capacity: usize,
        policy: DeliveryPolicy,
    ) -> Receiver<Trade> {
        debug!(%account_id, capacity, "registering trade subscription");
        let (tx, rx) = bounded(capacity);
        self.trade_sinks
            .insert(account_id, Sink::Channel { tx, policy });
        rx
    }

    /// Drop an account's trade listener; returns whether one existed
    pub fn unregister_trade_listener(&mut self, account_id: AccountId) -> bool {
        self.trade_sinks.remove(&account_id).is_some()
    }

    /// Register a synchronous quote callback for an account
    pub fn register_quote_listener(
        &mut self,
        account_id: AccountId,
        callback: impl FnMut(&Quote) + Send + 'static,
    ) {
        debug!(%account_id, "registering quote listener");
        self.quote_sinks
            .insert(account_id, Sink::Callback(Box::new(callback)));
    }

    /// Register a bounded quote subscription for an account
    pub fn subscribe_quotes(
        &mut self,
        account_id: AccountId,
        capacity: usize,
        policy: DeliveryPolicy,
    ) -> Receiver<Quote> {
        let (tx, rx) = bounded(capacity);
        self.quote_sinks
            .insert(account_id, Sink::Channel { tx, policy });
        rx
    }

    /// Drop an account's quote listener; returns whether one existed
    pub fn unregister_quote_listener(&mut self, account_id: AccountId) -> bool {
        self.quote_sinks.remove(&account_id).is_some()
    }

    /// Register a synchronous trade-price callback for an account
    pub fn register_trade_price_listener(
        &mut self,
        account_id: AccountId,
        callback: impl FnMut(&Price) + Send + 'static,
    ) {
        debug!(%account_id, "registering trade price listener");
        self.price_sinks
            .insert(account_id, Sink::Callback(Box::new(callback)));
    }

    /// Register a bounded trade-price subscription for an account
    pub fn subscribe_trade_prices(
        &mut self,
        account_id: AccountId,
        capacity: usize,
        policy: DeliveryPolicy,
    ) -> Receiver<Price> {
        let (tx, rx) = bounded(capacity);
        self.price_sinks
            .insert(account_id, Sink::Channel { tx, policy });
        rx
    }

    /// Drop an account's trade-price listener; returns whether one existed
    pub fn unregister_trade_price_listener(&mut self, account_id: AccountId) -> bool {
        self.price_sinks.remove(&account_id).is_some()
    }

    /// Deliver each trade to its account's listener, in generation order
    pub fn publish_trades(&mut self, trades: &[Trade]) {
        for trade in trades {
            debug!(trade_id = %trade.trade_id, account_id = %trade.account_id, "publishing trade");

            match self.trade_sinks.get_mut(&trade.account_id) {
                Some(sink) => sink.deliver(trade, "trade", trade.account_id),
                None => {
                    warn!(
                        account_id = %trade.account_id,
                        trade_id = %trade.trade_id,
                        "no trade listener registered for account"
                    );
                }
            }
        }
    }

    /// Deliver a top-of-book quote to every quote listener
    pub fn publish_quote(&mut self, quote: &Quote) {
        for (account_id, sink) in self.quote_sinks.iter_mut() {
            sink.deliver(quote, "quote", *account_id);
        }
    }

    /// Deliver a trade price to every trade-price listener
    pub fn publish_trade_price(&mut self, price: Price) {
        for (account_id, sink) in self.price_sinks.iter_mut() {
            sink.deliver(&price, "trade_price", *account_id);
        }
    }

    /// Whether an account currently has a trade listener
    pub fn has_trade_listener(&self, account_id: AccountId) -> bool {
        self.trade_sinks.contains_key(&account_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use types::ids::{OrderId, Symbol, TradeId};
    use types::numeric::Quantity;
    use types::order::{Metadata, Side};

    fn trade_for(account_id: AccountId, trade_id: u64) -> Trade {
        Trade::new(
            account_id,
            TradeId::new(trade_id),
            Quantity::from_u64(1),
            Price::from_u64(100),
            Side::BUY,
            Symbol::new("AA"),
            Some(OrderId::new(1)),
            Metadata::new(),
        )
    }

    #[test]
    fn test_callback_delivery() {
        let mut publisher = Publisher::new();
        let account = AccountId::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&received);
        publisher.register_trade_listener(account, move |trade: &Trade| {
            sink.lock().unwrap().push(trade.trade_id);
        });

        publisher.publish_trades(&[trade_for(account, 1), trade_for(account, 2)]);

        assert_eq!(
            *received.lock().unwrap(),
            vec![TradeId::new(1), TradeId::new(2)]
        );
    }

    #[test]
    fn test_missing_listener_is_not_an_error() {
        let mut publisher = Publisher::new();
        publisher.publish_trades(&[trade_for(AccountId::new(), 1)]);
    }

    #[test]
    fn test_panicking_listener_does_not_block_others() {
        let mut publisher = Publisher::new();
        let panicky = AccountId::new();
        let healthy = AccountId::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        publisher.register_trade_listener(panicky, |_: &Trade| {
            panic!("subscriber bug");
        });
        let sink = Arc::clone(&received);
        publisher.register_trade_listener(healthy, move |trade: &Trade| {
            sink.lock().unwrap().push(trade.trade_id);
        });

        publisher.publish_trades(&[trade_for(panicky, 1), trade_for(healthy, 2)]);

        assert_eq!(*received.lock().unwrap(), vec![TradeId::new(2)]);
    }

    #[test]
    fn test_bounded_subscription_drop_newest() {
        let mut publisher = Publisher::new();
        let account = AccountId::new();
        let rx = publisher.subscribe_trades(account, 1, DeliveryPolicy::DropNewest);

        publisher.publish_trades(&[trade_for(account, 1), trade_for(account, 2)]);

        assert_eq!(rx.recv().unwrap().trade_id, TradeId::new(1));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_disconnected_subscriber_is_tolerated() {
        let mut publisher = Publisher::new();
        let account = AccountId::new();
        let rx = publisher.subscribe_trades(account, 1, DeliveryPolicy::Block);
        drop(rx);

        publisher.publish_trades(&[trade_for(account, 1)]);
    }

    #[test]
    fn test_unregister() {
        let mut publisher = Publisher::new();
        let account = AccountId::new();
        publisher.register_trade_listener(account, |_: &Trade| {});

        assert!(publisher.has_trade_listener(account));
        assert!(publisher.unregister_trade_listener(account));
        assert!(!publisher.unregister_trade_listener(account));
        assert!(!publisher.has_trade_listener(account));
    }

    #[test]
    fn test_quote_broadcast() {
        let mut publisher = Publisher::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&received);
        publisher.register_quote_listener(AccountId::new(), move |quote: &Quote| {
            sink.lock().unwrap().push(quote.clone());
        });
        let rx = publisher.subscribe_quotes(AccountId::new(), 4, DeliveryPolicy::DropNewest);

        let quote = Quote::empty(Symbol::new("AA"));
        publisher.publish_quote(&quote);

        assert_eq!(*received.lock().unwrap(), vec![quote.clone()]);
        assert_eq!(rx.recv().unwrap(), quote);
    }

    #[test]
    fn test_trade_price_broadcast() {
        let mut publisher = Publisher::new();
        let rx = publisher.subscribe_trade_prices(AccountId::new(), 4, DeliveryPolicy::DropNewest);

        publisher.publish_trade_price(Price::from_u64(101));

        assert_eq!(rx.recv().unwrap(), Price::from_u64(101));
    }
}
