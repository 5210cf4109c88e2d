//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cart_service::{Operation, OperationError, ServiceError};
use domain::CartError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// A cart operation was rejected; the body carries the shopper-facing message.
    Rejected {
        operation: Operation,
        error: OperationError,
    },
    /// Bad request from the client.
    BadRequest(String),
}

impl ApiError {
    /// Wraps a rejected cart operation.
    pub fn rejected(operation: Operation, error: OperationError) -> Self {
        ApiError::Rejected { operation, error }
    }

    /// Returns the HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Rejected { error, .. } => operation_status(error),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Rejected { operation, error } => {
                if status.is_server_error() {
                    tracing::error!(%operation, error = %error, "cart operation failed");
                }
                error.message(operation).to_string()
            }
            ApiError::BadRequest(msg) => msg,
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn operation_status(err: &OperationError) -> StatusCode {
    match err {
        OperationError::Cart(cart_err) => match cart_err {
            CartError::ItemNotFound { .. } => StatusCode::NOT_FOUND,
            CartError::OutOfStock { .. } | CartError::AlreadyInCart { .. } => StatusCode::CONFLICT,
            CartError::InvalidAmount { .. } => StatusCode::BAD_REQUEST,
        },
        OperationError::Stock(ServiceError::NotFound(_))
        | OperationError::Catalog(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
        err if err.is_remote() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_storage::StorageError;
    use common::ProductId;

    #[test]
    fn test_cart_errors_map_to_client_statuses() {
        let missing = ApiError::rejected(
            Operation::RemoveProduct,
            CartError::ItemNotFound {
                product_id: ProductId::new(1),
            }
            .into(),
        );
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let short = ApiError::rejected(
            Operation::AddProduct,
            CartError::OutOfStock {
                product_id: ProductId::new(1),
                requested: 2,
                available: 1,
            }
            .into(),
        );
        assert_eq!(short.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_remote_and_storage_failures() {
        let unreachable = ApiError::rejected(
            Operation::AddProduct,
            OperationError::Stock(ServiceError::Unavailable("timeout".into())),
        );
        assert_eq!(unreachable.status(), StatusCode::BAD_GATEWAY);

        let unknown = ApiError::rejected(
            Operation::AddProduct,
            OperationError::Catalog(ServiceError::NotFound(ProductId::new(7))),
        );
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

        let storage = ApiError::rejected(
            Operation::Clear,
            StorageError::Unavailable("read-only".into()).into(),
        );
        assert_eq!(storage.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
