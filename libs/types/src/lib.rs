//! Types library for the matching engine
//!
//! This library provides the core value types shared by the exchange
//! service: identifiers, decimal price/quantity newtypes, orders, trades,
//! quotes, the fee schedule, and the error taxonomy.
//!
//! # Modules
//! - `ids`: Unique identifiers (OrderId, TradeId, AccountId, Symbol)
//! - `numeric`: Fixed-point decimal types (Price, Quantity)
//! - `order`: Order sides, kinds, requests, and resting orders
//! - `trade`: Trade execution records
//! - `quote`: Top-of-book snapshots
//! - `fee`: Transaction fee schedule
//! - `errors`: Error taxonomy

// Public modules
pub mod errors;
pub mod fee;
pub mod ids;
pub mod numeric;
pub mod order;
pub mod quote;
pub mod trade;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::*;
    pub use crate::fee::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::quote::*;
    pub use crate::trade::*;
}
