//! Products and stock levels served by the in-process catalog and stock client.

use std::path::Path;

use cart_service::{InMemoryCatalog, InMemoryStockClient};
use domain::{Product, StockLevel};
use serde::Deserialize;
use thiserror::Error;

const BUNDLED: &str = include_str!("../fixtures/catalog.json");

/// Errors loading a catalog seed.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read catalog seed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog seed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Catalog and stock contents, in the shape the storefront's fake API serves.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub stock: Vec<StockLevel>,
}

impl CatalogSeed {
    /// Parses a seed document.
    pub fn from_json(raw: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads a seed document from disk.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_json(&raw)
    }

    /// Returns the seed shipped with the binary.
    pub fn bundled() -> Result<Self, SeedError> {
        Self::from_json(BUNDLED)
    }

    /// Builds the in-memory collaborators holding this seed.
    pub fn into_services(self) -> (InMemoryCatalog, InMemoryStockClient) {
        let catalog = InMemoryCatalog::with_products(self.products);
        let stock =
            InMemoryStockClient::with_levels(self.stock.into_iter().map(|s| (s.id, s.amount)));
        (catalog, stock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_service::{Catalog, StockClient};
    use common::ProductId;

    #[test]
    fn bundled_seed_parses() {
        let seed = CatalogSeed::bundled().unwrap();
        assert_eq!(seed.products.len(), 6);
        assert_eq!(seed.stock.len(), 6);
    }

    #[tokio::test]
    async fn services_serve_seed() {
        let seed = CatalogSeed::from_json(
            r#"{
                "products": [{"id": 9, "title": "Chinelo", "price": {"cents": 2990}, "image": "x.jpg", "color": "azul"}],
                "stock": [{"id": 9, "amount": 4}]
            }"#,
        )
        .unwrap();

        let (catalog, stock) = seed.into_services();

        let product = catalog.get_product(ProductId::new(9)).await.unwrap();
        assert_eq!(product.title, "Chinelo");
        assert_eq!(product.extra["color"], "azul");
        assert_eq!(stock.get_stock(ProductId::new(9)).await.unwrap().amount, 4);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let result = CatalogSeed::load("/nonexistent/seed.json").await;
        assert!(matches!(result, Err(SeedError::Io(_))));
    }
}
