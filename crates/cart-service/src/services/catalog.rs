//! Product catalog trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use common::ProductId;
use domain::Product;

use crate::error::ServiceError;

/// Read-only product metadata lookup.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetches the catalog entry for a product.
    async fn get_product(&self, product_id: ProductId) -> Result<Product, ServiceError>;
}

#[async_trait]
impl<T: Catalog + ?Sized> Catalog for Arc<T> {
    async fn get_product(&self, product_id: ProductId) -> Result<Product, ServiceError> {
        (**self).get_product(product_id).await
    }
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    products: HashMap<ProductId, Product>,
    fail_on_get: bool,
    calls: usize,
}

/// In-memory catalog for testing and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding `products`.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let catalog = Self::new();
        for product in products {
            catalog.insert(product);
        }
        catalog
    }

    /// Adds or replaces a product.
    pub fn insert(&self, product: Product) {
        self.write().products.insert(product.id, product);
    }

    /// Configures every lookup to fail.
    pub fn set_fail_on_get(&self, fail: bool) {
        self.write().fail_on_get = fail;
    }

    /// Returns the number of lookups served so far.
    pub fn call_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .calls
    }

    /// Returns the number of products in the catalog.
    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .products
            .len()
    }

    /// Returns true if the catalog holds no products.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, InMemoryCatalogState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn get_product(&self, product_id: ProductId) -> Result<Product, ServiceError> {
        let mut state = self.write();
        state.calls += 1;

        if state.fail_on_get {
            return Err(ServiceError::Unavailable(
                "catalog service unavailable".to_string(),
            ));
        }

        state
            .products
            .get(&product_id)
            .cloned()
            .ok_or(ServiceError::NotFound(product_id))
    }
}
