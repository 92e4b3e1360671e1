//! Error taxonomy for the matching engine
//!
//! Validation failures are rejected before any state mutation and are
//! fully recoverable by the caller. A failed cancel means the order is no
//! longer live; the engine does not distinguish "already matched" from
//! "never existed". Book inconsistencies are engine defects: they abort
//! the current operation only, never the engine.

use crate::ids::OrderId;
use thiserror::Error;

/// Top-level error for submit/cancel operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("order {order_id} not found; it was likely already matched or canceled")]
    OrderNotFound { order_id: OrderId },

    #[error("order book inconsistency: {message}")]
    BookInconsistency { message: String },
}

/// Admission failures, raised before an order id is assigned
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("symbol {got} is not traded on this exchange (expected {expected})")]
    SymbolMismatch { expected: String, got: String },

    #[error("quantity must be positive, got {got}")]
    InvalidQuantity { got: String },

    #[error("limit price must be positive, got {got}")]
    InvalidPrice { got: String },
}
