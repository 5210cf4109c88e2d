//! Cart endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use cart_service::{CartSnapshot, Operation, Outcome};
use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::SharedCartStore;
use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub store: SharedCartStore,
}

// -- Request types --

#[derive(Deserialize)]
pub struct UpdateAmountRequest {
    pub amount: i64,
}

impl UpdateAmountRequest {
    /// Amount for the store: anything below 1 becomes 0, which the store
    /// ignores; anything above `u32::MAX` is clamped and fails the stock check.
    pub fn store_amount(&self) -> u32 {
        u32::try_from(self.amount.max(0)).unwrap_or(u32::MAX)
    }
}

// -- Response types --

#[derive(Serialize)]
pub struct CartResponse {
    #[serde(flatten)]
    pub snapshot: CartSnapshot,
    pub count: usize,
    pub total_quantity: u32,
    pub total_cents: i64,
    pub total: String,
}

impl From<CartSnapshot> for CartResponse {
    fn from(snapshot: CartSnapshot) -> Self {
        let total = snapshot.total();
        Self {
            count: snapshot.count(),
            total_quantity: snapshot.total_quantity(),
            total_cents: total.cents(),
            total: total.to_string(),
            snapshot,
        }
    }
}

fn respond(
    state: &AppState,
    operation: Operation,
    outcome: Outcome,
) -> Result<Json<CartResponse>, ApiError> {
    match outcome {
        Outcome::Applied(snapshot) => Ok(Json(snapshot.into())),
        Outcome::Unchanged => Ok(Json(state.store.snapshot().into())),
        Outcome::Rejected(error) => Err(ApiError::rejected(operation, error)),
    }
}

// -- Handlers --

/// GET /cart
pub async fn get(State(state): State<Arc<AppState>>) -> Json<CartResponse> {
    Json(state.store.snapshot().into())
}

/// POST /cart/items/{id}: adds one unit.
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartResponse>, ApiError> {
    let outcome = state.store.add_product(product_id).await;
    respond(&state, Operation::AddProduct, outcome)
}

/// PUT /cart/items/{id}: sets the amount.
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<ProductId>,
    body: Result<Json<UpdateAmountRequest>, JsonRejection>,
) -> Result<Json<CartResponse>, ApiError> {
    let Json(req) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let outcome = state
        .store
        .update_product_amount(product_id, req.store_amount())
        .await;
    respond(&state, Operation::UpdateAmount, outcome)
}

/// DELETE /cart/items/{id}
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartResponse>, ApiError> {
    let outcome = state.store.remove_product(product_id).await;
    respond(&state, Operation::RemoveProduct, outcome)
}

/// DELETE /cart
pub async fn clear(State(state): State<Arc<AppState>>) -> Result<Json<CartResponse>, ApiError> {
    let outcome = state.store.clear().await;
    respond(&state, Operation::Clear, outcome)
}
