//! Domain error types.

use common::ProductId;
use thiserror::Error;

/// Business rule violations raised by the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The product has no line item in the cart.
    #[error("Item not found: {product_id}")]
    ItemNotFound { product_id: ProductId },

    /// Not enough units in stock for the requested amount.
    #[error("Out of stock: product {product_id} requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// Line item amounts must be at least 1.
    #[error("Invalid amount: {amount} (must be greater than 0)")]
    InvalidAmount { amount: u32 },

    /// The product already has a line item in the cart.
    #[error("Product already in cart: {product_id}")]
    AlreadyInCart { product_id: ProductId },
}

impl CartError {
    /// Returns a short machine-readable reason, used as a metrics label.
    pub fn reason(&self) -> &'static str {
        match self {
            CartError::ItemNotFound { .. } => "not_found",
            CartError::OutOfStock { .. } => "out_of_stock",
            CartError::InvalidAmount { .. } => "invalid_amount",
            CartError::AlreadyInCart { .. } => "already_in_cart",
        }
    }
}
