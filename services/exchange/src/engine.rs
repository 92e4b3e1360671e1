//! The exchange
//!
//! Main coordinator: validates requests, assigns order ids, routes by
//! (kind, side), runs the fill loops against the book, and hands the
//! resulting trades to the publication layer.
//!
//! One `Exchange` instance trades one symbol and is a single-writer
//! resource: every mutating operation takes `&mut self`, so ownership
//! serializes submissions and cancellations and the matching loops of two
//! orders can never interleave. Read-only queries return value snapshots.

use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};

use types::errors::ExchangeError;
use types::fee::FeeSchedule;
use types::ids::{AccountId, OrderId, Symbol};
use types::numeric::Price;
use types::order::{Order, OrderKind, OrderRequest, Side};
use types::quote::Quote;
use types::trade::Trade;

use crate::book::{CondensedOrderBook, OrderBook, Visit};
use crate::matching::{crossing, MatchExecutor};
use crate::publish::{DeliveryPolicy, Publisher};
use crate::validation;

/// Single-instrument matching engine
pub struct Exchange {
    symbol: Symbol,
    next_order_id: u64,
    book: OrderBook,
    executor: MatchExecutor,
    publisher: Publisher,
}

impl Exchange {
    /// Create an engine for one symbol with the given fee schedule
    pub fn new(symbol: Symbol, fees: FeeSchedule) -> Self {
        Self {
            symbol: symbol.clone(),
            next_order_id: 0,
            book: OrderBook::new(symbol),
            executor: MatchExecutor::new(fees),
            publisher: Publisher::new(),
        }
    }

    /// The symbol this engine trades
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Submit an order
    ///
    /// Validates, assigns a fresh order id, matches what is marketable,
    /// rests any limit remainder, and publishes the resulting trades and
    /// quote change. Market orders are best-effort: when the opposite side
    /// runs out of liquidity the unfilled remainder is dropped (with a
    /// warning), not rested and not reported as an error — callers that
    /// need the fill outcome should listen for trades.
    pub fn submit_order(&mut self, request: OrderRequest) -> Result<OrderId, ExchangeError> {
        validation::validate_order(&self.symbol, &request)?;

        self.next_order_id += 1;
        let order_id = OrderId::new(self.next_order_id);
        let mut order = Order::accepted(order_id, request);
        debug!(
            %order_id,
            side = ?order.side,
            kind = ?order.kind,
            quantity = %order.remaining_quantity,
            "accepted order"
        );

        let before = self.book.top_of_book();

        let trades = match order.kind {
            OrderKind::Market => self.fill(&mut order, None),
            OrderKind::Limit(limit) => {
                let opposite_best = match order.side {
                    Side::BUY => self.book.best_ask(),
                    Side::SELL => self.book.best_bid(),
                };
                let marketable =
                    opposite_best.is_some_and(|best| crossing::crosses(order.side, limit, best));

                let trades = if marketable {
                    self.fill(&mut order, Some(limit))
                } else {
                    Vec::new()
                };

                if order.remaining_quantity.is_positive() {
                    self.book.insert(order)?;
                }
                trades
            }
        };

        if !trades.is_empty() {
            self.publisher.publish_trades(&trades);
        }
        self.publish_quote_if_changed(&before);

        Ok(order_id)
    }

    /// Consume opposite-side levels until the taker is filled, liquidity
    /// runs out, or the stopping price no longer crosses
    ///
    /// The stopping price bounds limit orders: it is checked against the
    /// freshly resolved opposite best before each level is touched, so a
    /// limit order never trades beyond its own price.
    fn fill(&mut self, taker: &mut Order, stopping_price: Option<Price>) -> Vec<Trade> {
        let Exchange {
            symbol,
            book,
            executor,
            ..
        } = self;
        let mut trades = Vec::new();

        while taker.remaining_quantity.is_positive() {
            let opposite_best = match taker.side {
                Side::BUY => book.best_ask(),
                Side::SELL => book.best_bid(),
            };
            let Some(best) = opposite_best else {
                warn!(
                    order_id = %taker.order_id,
                    remaining = %taker.remaining_quantity,
                    "opposite side exhausted before the order was fully filled"
                );
                break;
            };

            if let Some(limit) = stopping_price {
                if !crossing::crosses(taker.side, limit, best) {
                    break;
                }
            }

            book.consume_best(taker.side, |price, resting| {
                trades.extend(executor.execute(symbol, taker, resting, price));
                if taker.remaining_quantity.is_zero() {
                    Visit::Stop
                } else {
                    Visit::Continue
                }
            });
        }

        trades
    }

    /// Cancel a resting order by id
    ///
    /// Fails with `OrderNotFound` when the id is not live — already
    /// matched, already canceled, or never issued; the engine does not
    /// distinguish the causes.
    pub fn cancel_order(&mut self, order_id: OrderId) -> Result<(), ExchangeError> {
        info!(%order_id, "processing cancel");
        let before = self.book.top_of_book();

        let canceled = self.book.cancel(order_id)?;
        debug!(%order_id, account_id = %canceled.account_id, "order canceled");

        self.publish_quote_if_changed(&before);
        Ok(())
    }

    /// Settle every resting order crossed by a reference price
    ///
    /// Asks strictly below and bids strictly above the reference are
    /// removed and settled in full at their own resting price, each as a
    /// single-leg trade. Trades are published, then every trade-price
    /// listener is told the new reference. This is the operation a
    /// historical-replay driver uses instead of touching book internals.
    pub fn settle_to_price(&mut self, reference: Price) -> Vec<Trade> {
        let before = self.book.top_of_book();

        let mut settled = self.book.drain_asks_below(reference);
        settled.extend(self.book.drain_bids_above(reference));

        let mut trades = Vec::with_capacity(settled.len());
        for mut order in settled {
            match order.limit_price() {
                Some(price) => {
                    trades.push(self.executor.settle_order(&self.symbol, &mut order, price));
                }
                None => warn!(
                    order_id = %order.order_id,
                    "order without a resting price skipped during settlement"
                ),
            }
        }

        if !trades.is_empty() {
            self.publisher.publish_trades(&trades);
        }
        self.publish_quote_if_changed(&before);
        self.publisher.publish_trade_price(reference);

        trades
    }

    /// Drop every resting order and the cancellation index
    ///
    /// For test and simulation reinitialization, not ordinary operation.
    pub fn clear_exchange(&mut self) {
        info!(symbol = %self.symbol, "clearing the exchange");
        let before = self.book.top_of_book();
        self.book.clear();
        self.publish_quote_if_changed(&before);
    }

    /// Current top of book
    pub fn top_of_book(&self) -> Quote {
        self.book.top_of_book()
    }

    /// Per-level aggregate view of the current book
    pub fn condensed_order_book(&self) -> CondensedOrderBook {
        self.book.condensed()
    }

    /// Live orders belonging to one account: (id, side, resting price)
    pub fn open_orders_for_account(&self, account_id: AccountId) -> Vec<(OrderId, Side, Price)> {
        self.book.orders_for_account(account_id)
    }

    /// Number of orders currently resting in the book
    pub fn open_order_count(&self) -> usize {
        self.book.order_count()
    }

    /// Register a synchronous trade callback for an account
    pub fn register_trade_listener(
        &mut self,
        account_id: AccountId,
        callback: impl FnMut(&Trade) + Send + 'static,
    ) {
        self.publisher.register_trade_listener(account_id, callback);
    }

    /// Register a bounded trade subscription for an account
    pub fn subscribe_trades(
        &mut self,
        account_id: AccountId,
        capacity: usize,
        policy: DeliveryPolicy,
    ) -> Receiver<Trade> {
        self.publisher.subscribe_trades(account_id, capacity, policy)
    }

    /// Drop an account's trade listener
    pub fn unregister_trade_listener(&mut self, account_id: AccountId) -> bool {
        self.publisher.unregister_trade_listener(account_id)
    }

    /// Register a synchronous quote callback for an account
    pub fn register_quote_listener(
        &mut self,
        account_id: AccountId,
        callback: impl FnMut(&Quote) + Send + 'static,
    ) {
        self.publisher.register_quote_listener(account_id, callback);
    }

    /// Register a bounded quote subscription for an account
    pub fn subscribe_quotes(
        &mut self,
        account_id: AccountId,
        capacity: usize,
        policy: DeliveryPolicy,
    ) -> Receiver<Quote> {
        self.publisher.subscribe_quotes(account_id, capacity, policy)
    }

    /// Drop an account's quote listener
    pub fn unregister_quote_listener(&mut self, account_id: AccountId) -> bool {
        self.publisher.unregister_quote_listener(account_id)
    }

    /// Register a synchronous trade-price callback for an account
    pub fn register_trade_price_listener(
        &mut self,
        account_id: AccountId,
        callback: impl FnMut(&Price) + Send + 'static,
    ) {
        self.publisher
            .register_trade_price_listener(account_id, callback);
    }

    /// Register a bounded trade-price subscription for an account
    pub fn subscribe_trade_prices(
        &mut self,
        account_id: AccountId,
        capacity: usize,
        policy: DeliveryPolicy,
    ) -> Receiver<Price> {
        self.publisher
            .subscribe_trade_prices(account_id, capacity, policy)
    }

    /// Drop an account's trade-price listener
    pub fn unregister_trade_price_listener(&mut self, account_id: AccountId) -> bool {
        self.publisher.unregister_trade_price_listener(account_id)
    }

    fn publish_quote_if_changed(&mut self, before: &Quote) {
        let after = self.book.top_of_book();
        if after != *before {
            self.publisher.publish_quote(&after);
        }
    }
}
