//! Stock lookup trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::ProductId;
use domain::StockLevel;

use crate::error::ServiceError;

/// Read-only access to the remote inventory.
#[async_trait]
pub trait StockClient: Send + Sync {
    /// Returns how many units of a product are available right now.
    async fn get_stock(&self, product_id: ProductId) -> Result<StockLevel, ServiceError>;
}

#[async_trait]
impl<T: StockClient + ?Sized> StockClient for Arc<T> {
    async fn get_stock(&self, product_id: ProductId) -> Result<StockLevel, ServiceError> {
        (**self).get_stock(product_id).await
    }
}

#[derive(Debug, Default)]
struct InMemoryStockState {
    levels: HashMap<ProductId, u32>,
    fail_on_get: bool,
    calls: usize,
    delay: Option<Duration>,
}

/// In-memory stock client for testing and local runs.
///
/// Clones share the same stock table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStockClient {
    state: Arc<RwLock<InMemoryStockState>>,
}

impl InMemoryStockClient {
    /// Creates a stock client with no products.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stock client seeded with `(product, units)` pairs.
    pub fn with_levels(levels: impl IntoIterator<Item = (ProductId, u32)>) -> Self {
        let client = Self::new();
        for (product_id, amount) in levels {
            client.set_stock(product_id, amount);
        }
        client
    }

    /// Sets the units available for a product.
    pub fn set_stock(&self, product_id: ProductId, amount: u32) {
        self.write().levels.insert(product_id, amount);
    }

    /// Configures every lookup to fail.
    pub fn set_fail_on_get(&self, fail: bool) {
        self.write().fail_on_get = fail;
    }

    /// Delays every lookup, simulating a slow network.
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.write().delay = delay;
    }

    /// Returns the number of lookups served so far, failed ones included.
    pub fn call_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .calls
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, InMemoryStockState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StockClient for InMemoryStockClient {
    async fn get_stock(&self, product_id: ProductId) -> Result<StockLevel, ServiceError> {
        let (delay, fail, level) = {
            let mut state = self.write();
            state.calls += 1;
            (
                state.delay,
                state.fail_on_get,
                state.levels.get(&product_id).copied(),
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if fail {
            return Err(ServiceError::Unavailable(
                "stock service unavailable".to_string(),
            ));
        }

        level
            .map(|amount| StockLevel::new(product_id, amount))
            .ok_or(ServiceError::NotFound(product_id))
    }
}
