//! Trade execution
//!
//! Builds both legs of a match, assigns the shared trade id, and records
//! the per-leg transaction fee. The execution price is always the maker's
//! resting price, never the taker's limit: aggressive orders get price
//! improvement, and the maker's queue position is honored at the price it
//! was earned.

use tracing::debug;
use types::fee::FeeSchedule;
use types::ids::{Symbol, TradeId};
use types::numeric::Price;
use types::order::Order;
use types::trade::Trade;

/// Builds trades and owns the engine-global trade-id counter
#[derive(Debug, Clone)]
pub struct MatchExecutor {
    next_trade_id: u64,
    fees: FeeSchedule,
}

impl MatchExecutor {
    /// Create an executor with the given fee schedule
    pub fn new(fees: FeeSchedule) -> Self {
        Self {
            next_trade_id: 0,
            fees,
        }
    }

    fn next_trade_id(&mut self) -> TradeId {
        self.next_trade_id += 1;
        TradeId::new(self.next_trade_id)
    }

    /// Match a taker against a resting maker at the maker's price
    ///
    /// Fills both orders by min(remaining), records the fee into each
    /// order's metadata, and returns the two legs (taker first), sharing
    /// one fresh trade id.
    pub fn execute(
        &mut self,
        symbol: &Symbol,
        taker: &mut Order,
        maker: &mut Order,
        price: Price,
    ) -> [Trade; 2] {
        let quantity = taker.remaining_quantity.min(maker.remaining_quantity);
        let fee = self.fees.transaction_fee(price, quantity);
        taker.set_transaction_fee(fee);
        maker.set_transaction_fee(fee);

        let trade_id = self.next_trade_id();
        debug!(
            %trade_id,
            taker_order = %taker.order_id,
            maker_order = %maker.order_id,
            %price,
            %quantity,
            "matched orders"
        );

        let legs = [
            Trade::new(
                taker.account_id,
                trade_id,
                quantity,
                price,
                taker.side,
                symbol.clone(),
                Some(taker.order_id),
                taker.metadata.clone(),
            ),
            Trade::new(
                maker.account_id,
                trade_id,
                quantity,
                price,
                maker.side,
                symbol.clone(),
                Some(maker.order_id),
                maker.metadata.clone(),
            ),
        ];

        taker.fill(quantity);
        maker.fill(quantity);

        legs
    }

    /// Settle one order in full at its resting price, as a single leg
    ///
    /// Used by reference-price settlement, where the counterparty is the
    /// moving market itself rather than another resting order.
    pub fn settle_order(&mut self, symbol: &Symbol, order: &mut Order, price: Price) -> Trade {
        let quantity = order.remaining_quantity;
        let fee = self.fees.transaction_fee(price, quantity);
        order.set_transaction_fee(fee);

        let trade_id = self.next_trade_id();
        let leg = Trade::new(
            order.account_id,
            trade_id,
            quantity,
            price,
            order.side,
            symbol.clone(),
            Some(order.order_id),
            order.metadata.clone(),
        );

        order.fill(quantity);
        leg
    }
}
