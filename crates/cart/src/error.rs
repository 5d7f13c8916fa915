//! Cart error types.
//!
//! Validation failures are reported to the caller and never touch the
//! current state. Storage failures live in [`crate::storage::StorageError`].

use shopfront_core::{CurrencyCode, ProductError, ProductId};
use thiserror::Error;

/// A rejected cart mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Quantity must be at least one.
    #[error("Invalid quantity: must be at least 1")]
    InvalidQuantity,

    /// Product is missing required fields.
    #[error("Invalid product: {0}")]
    InvalidProduct(#[from] ProductError),

    /// Product is priced in a different currency than the cart.
    #[error("Currency mismatch for {id}: cart uses {expected}, product is priced in {found}")]
    CurrencyMismatch {
        id: ProductId,
        expected: CurrencyCode,
        found: CurrencyCode,
    },
}

/// A cart line that violates a state invariant.
///
/// Only produced while rebuilding state from outside data (storage).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("line has an empty product id")]
    EmptyId,
    #[error("line {0} has an empty name")]
    EmptyName(ProductId),
    #[error("line {0} has a negative unit price")]
    NegativePrice(ProductId),
    #[error("line {0} has a zero quantity")]
    ZeroQuantity(ProductId),
    #[error("product {0} appears on more than one line")]
    Duplicate(ProductId),
}
