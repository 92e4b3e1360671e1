//! Single-instrument matching engine
//!
//! Accepts market and limit orders for one symbol, matches marketable
//! orders against the resting book under price-time priority, and
//! publishes trades and top-of-book quotes to registered listeners.
//!
//! **Key invariants:**
//! - Price-time priority strictly enforced within a price level
//! - Trades always execute at the maker's resting price
//! - Quantity is conserved: both legs of a match carry the same quantity
//! - The book is never crossed once a submit call returns
//! - Empty price levels are removed eagerly; no zero-quantity order rests

pub mod book;
pub mod engine;
pub mod matching;
pub mod publish;
pub mod validation;

pub use book::{CondensedOrderBook, OrderBook, Visit};
pub use engine::Exchange;
pub use publish::{DeliveryPolicy, Publisher};
