//! Cart service error types.

use cart_storage::StorageError;
use common::ProductId;
use domain::CartError;
use thiserror::Error;

use crate::messages::{self, Operation};

/// Errors reported by the remote stock and catalog collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The remote service could not be reached.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The remote service does not know the product.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The remote service answered with something unreadable.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Why a cart operation was rejected.
///
/// Every variant is terminal for the operation that produced it: the cart
/// is left untouched and the error is reported, never retried.
#[derive(Debug, Error)]
pub enum OperationError {
    /// Fetching the stock level failed.
    #[error("Stock lookup failed: {0}")]
    Stock(ServiceError),

    /// Fetching the product from the catalog failed.
    #[error("Catalog lookup failed: {0}")]
    Catalog(ServiceError),

    /// A cart rule rejected the change.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Persisting the new cart failed.
    #[error("Persisting the cart failed: {0}")]
    Storage(#[from] StorageError),
}

impl OperationError {
    /// Returns the user-facing message for this failure.
    ///
    /// Stock shortages share one message across operations; every other
    /// failure is reported with the message of the operation it aborted.
    pub fn message(&self, operation: Operation) -> &'static str {
        match self {
            OperationError::Cart(CartError::OutOfStock { .. }) => messages::OUT_OF_STOCK,
            OperationError::Storage(_) => messages::SAVE_FAILED,
            _ => operation.failure_message(),
        }
    }

    /// Returns a short machine-readable reason, used as a metrics label.
    pub fn reason(&self) -> &'static str {
        match self {
            OperationError::Stock(_) => "stock_unavailable",
            OperationError::Catalog(_) => "catalog_unavailable",
            OperationError::Cart(err) => err.reason(),
            OperationError::Storage(_) => "storage",
        }
    }

    /// Returns true if the failure came from a remote collaborator.
    pub fn is_remote(&self) -> bool {
        matches!(self, OperationError::Stock(_) | OperationError::Catalog(_))
    }
}
