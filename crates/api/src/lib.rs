//! HTTP API server with observability for the shopping cart.
//!
//! Exposes a single cart store over REST, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod seed;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use cart_service::{CartRepository, CartStore, Catalog, NotificationSink, StockClient};
use cart_storage::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, PostgresKeyValueStore};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::{Config, StorageBackend};
use routes::cart::AppState;
use seed::CatalogSeed;

/// Cart store with every collaborator chosen at runtime.
pub type SharedCartStore = CartStore<
    Arc<dyn KeyValueStore>,
    Arc<dyn StockClient>,
    Arc<dyn Catalog>,
    Arc<dyn NotificationSink>,
>;

/// Errors raised while assembling the application.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Storage(#[from] cart_storage::StorageError),

    #[error(transparent)]
    Seed(#[from] seed::SeedError),

    #[error("CART_STORAGE=postgres requires DATABASE_URL")]
    MissingDatabaseUrl,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/cart",
            get(routes::cart::get).delete(routes::cart::clear),
        )
        .route(
            "/cart/items/{id}",
            post(routes::cart::add_item)
                .put(routes::cart::update_item)
                .delete(routes::cart::remove_item),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Opens the storage backend named by the configuration.
pub async fn open_storage(config: &Config) -> Result<Arc<dyn KeyValueStore>, StartupError> {
    let storage: Arc<dyn KeyValueStore> = match config.storage {
        StorageBackend::Memory => Arc::new(InMemoryKeyValueStore::new()),
        StorageBackend::File => Arc::new(FileKeyValueStore::new(&config.storage_path)),
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or(StartupError::MissingDatabaseUrl)?;
            let store = PostgresKeyValueStore::connect(url).await?;
            store
                .run_migrations()
                .await
                .map_err(cart_storage::StorageError::from)?;
            Arc::new(store)
        }
    };
    tracing::info!(backend = %config.storage, "cart storage ready");
    Ok(storage)
}

/// Loads the catalog seed named by the configuration, or the bundled one.
pub async fn load_seed(config: &Config) -> Result<CatalogSeed, StartupError> {
    let seed = match &config.catalog_seed_path {
        Some(path) => CatalogSeed::load(path).await?,
        None => CatalogSeed::bundled()?,
    };
    tracing::info!(products = seed.products.len(), "catalog seed loaded");
    Ok(seed)
}

/// Opens the cart store over `storage` and returns the application state.
pub async fn create_state(
    storage: Arc<dyn KeyValueStore>,
    cart_key: &str,
    seed: CatalogSeed,
    notifier: Arc<dyn NotificationSink>,
) -> Arc<AppState> {
    let (catalog, stock) = seed.into_services();
    let store = CartStore::open(
        CartRepository::with_key(storage, cart_key),
        Arc::new(stock) as Arc<dyn StockClient>,
        Arc::new(catalog) as Arc<dyn Catalog>,
        notifier,
    )
    .await;

    Arc::new(AppState { store })
}
