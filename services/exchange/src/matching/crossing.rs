//! Crossing detection
//!
//! A limit order is marketable while its limit still reaches the best
//! price on the opposite side: a buy crosses while limit ≥ best ask, a
//! sell while limit ≤ best bid.

use types::numeric::Price;
use types::order::Side;

/// Check whether a taker's limit reaches the opposite side's best price
pub fn crosses(taker_side: Side, limit: Price, opposite_best: Price) -> bool {
    match taker_side {
        Side::BUY => limit >= opposite_best,
        Side::SELL => limit <= opposite_best,
    }
}
