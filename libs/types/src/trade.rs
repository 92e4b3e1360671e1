//! Trade execution records
//!
//! Every match produces two trades, one per leg, sharing a trade id. A
//! trade is immutable once created; ownership passes to the publication
//! layer.

use crate::fee::TRANSACTION_FEE_KEY;
use crate::ids::{AccountId, OrderId, Symbol, TradeId};
use crate::numeric::{Price, Quantity};
use crate::order::{Metadata, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One leg of an execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Account the leg belongs to
    pub account_id: AccountId,
    /// Shared by both legs of the same match
    pub trade_id: TradeId,
    pub quantity: Quantity,
    /// Execution price; always the maker's resting price
    pub price: Price,
    /// Side of this leg's own order
    pub side: Side,
    pub symbol: Symbol,
    /// The order this leg executed against its own book entry
    pub order_id: Option<OrderId>,
    /// Carries the per-leg transaction fee, plus any caller keys
    pub metadata: Metadata,
}

impl Trade {
    /// Create a new trade leg
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_id: AccountId,
        trade_id: TradeId,
        quantity: Quantity,
        price: Price,
        side: Side,
        symbol: Symbol,
        order_id: Option<OrderId>,
        metadata: Metadata,
    ) -> Self {
        Self {
            account_id,
            trade_id,
            quantity,
            price,
            side,
            symbol,
            order_id,
            metadata,
        }
    }

    /// Notional value of the leg (price × quantity)
    pub fn notional(&self) -> Decimal {
        self.quantity.as_decimal() * self.price.as_decimal()
    }

    /// The per-leg transaction fee recorded at match time, if any
    pub fn transaction_fee(&self) -> Option<Decimal> {
        self.metadata
            .get(TRANSACTION_FEE_KEY)
            .and_then(|raw| Decimal::from_str_exact(raw).ok())
    }
}
