//! Order admission rules
//!
//! Rejections happen before an order id is assigned and before any book
//! mutation, so a failed submission leaves no trace. Negative prices are
//! rejected even though some instruments trade negative; this venue does
//! not.

use types::errors::ValidationError;
use types::ids::Symbol;
use types::order::{OrderKind, OrderRequest};

/// Validate a request against the engine's symbol and the basic
/// quantity/price rules
pub fn validate_order(
    engine_symbol: &Symbol,
    request: &OrderRequest,
) -> Result<(), ValidationError> {
    if request.symbol != *engine_symbol {
        return Err(ValidationError::SymbolMismatch {
            expected: engine_symbol.to_string(),
            got: request.symbol.to_string(),
        });
    }

    if !request.quantity.is_positive() {
        return Err(ValidationError::InvalidQuantity {
            got: request.quantity.to_string(),
        });
    }

    if let OrderKind::Limit(price) = request.kind {
        if !price.is_positive() {
            return Err(ValidationError::InvalidPrice {
                got: price.to_string(),
            });
        }
    }

    Ok(())
}
