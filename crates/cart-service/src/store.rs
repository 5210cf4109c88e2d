//! The cart store.
//!
//! Every operation runs under one async lock that is held across the
//! stock and catalog lookups, so operations issued back to back never
//! decide on a stale cart. Changes are applied to a copy, persisted, and
//! only then made current and published.

use std::time::Instant;

use cart_storage::KeyValueStore;
use chrono::{DateTime, Utc};
use common::ProductId;
use domain::{AddPlan, Aggregate, Cart, CartEvent, Money, Product, StockLevel};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};

use crate::error::OperationError;
use crate::messages::Operation;
use crate::repository::CartRepository;
use crate::services::{Catalog, NotificationSink, StockClient};

/// Immutable copy of the cart published after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// The cart contents.
    #[serde(rename = "items")]
    pub cart: Cart,

    /// Number of changes applied since the store was opened.
    pub version: u64,

    /// When this snapshot was taken.
    pub updated_at: DateTime<Utc>,
}

impl CartSnapshot {
    fn new(cart: Cart, version: u64) -> Self {
        Self {
            cart,
            version,
            updated_at: Utc::now(),
        }
    }

    /// Number of distinct products, as shown on the header badge.
    pub fn count(&self) -> usize {
        self.cart.len()
    }

    /// Sum of all line amounts.
    pub fn total_quantity(&self) -> u32 {
        self.cart.total_quantity()
    }

    /// Sum of all line subtotals.
    pub fn total(&self) -> Money {
        self.cart.total()
    }
}

/// Result of a cart operation.
///
/// Failures have already been reported to the notification sink by the
/// time an outcome is returned; callers may inspect it but need not act.
#[derive(Debug)]
pub enum Outcome {
    /// The cart changed and was persisted.
    Applied(CartSnapshot),

    /// The request was valid but had nothing to do.
    Unchanged,

    /// The request failed and the cart was left as it was.
    Rejected(OperationError),
}

impl Outcome {
    /// Returns true if the cart changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    /// Returns true if the request failed.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    /// Returns the new snapshot, if the cart changed.
    pub fn snapshot(&self) -> Option<&CartSnapshot> {
        match self {
            Outcome::Applied(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Returns the failure, if the request was rejected.
    pub fn error(&self) -> Option<&OperationError> {
        match self {
            Outcome::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

struct StoreState {
    cart: Cart,
    version: u64,
}

/// Owns the shopper's cart and applies every change to it.
pub struct CartStore<S, C, K, N> {
    repository: CartRepository<S>,
    stock: C,
    catalog: K,
    notifier: N,
    state: Mutex<StoreState>,
    snapshots: watch::Sender<CartSnapshot>,
}

impl<S, C, K, N> CartStore<S, C, K, N>
where
    S: KeyValueStore,
    C: StockClient,
    K: Catalog,
    N: NotificationSink,
{
    /// Opens the store with the persisted cart.
    ///
    /// A slot that cannot be read or decoded is logged and the store
    /// starts with an empty cart.
    #[tracing::instrument(skip_all, fields(key = repository.key()))]
    pub async fn open(repository: CartRepository<S>, stock: C, catalog: K, notifier: N) -> Self {
        let cart = match repository.load().await {
            Ok(cart) => cart,
            Err(err) => {
                tracing::warn!(error = %err, "stored cart unreadable, starting empty");
                Cart::new()
            }
        };
        tracing::info!(items = cart.len(), "cart store opened");

        let (snapshots, _) = watch::channel(CartSnapshot::new(cart.clone(), 0));

        Self {
            repository,
            stock,
            catalog,
            notifier,
            state: Mutex::new(StoreState { cart, version: 0 }),
            snapshots,
        }
    }

    /// Returns the latest snapshot.
    pub fn snapshot(&self) -> CartSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Subscribes to snapshots published after each change.
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.snapshots.subscribe()
    }

    /// Returns the persistence adapter.
    pub fn repository(&self) -> &CartRepository<S> {
        &self.repository
    }

    /// Returns the notification sink.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Adds one unit of a product.
    ///
    /// A product new to the cart is looked up in the catalog and appended
    /// with an amount of 1; an existing line grows by one. Either way the
    /// stock must cover the resulting amount.
    #[tracing::instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> Outcome {
        let operation = Operation::AddProduct;
        metrics::counter!("cart_operations_total", "operation" => operation.as_str()).increment(1);

        let mut state = self.state.lock().await;
        let planned = self.plan_add(&state.cart, product_id).await;
        match planned {
            Ok(events) => self.commit(operation, &mut state, events).await,
            Err(err) => self.reject(operation, err),
        }
    }

    /// Removes a product's line.
    #[tracing::instrument(skip(self))]
    pub async fn remove_product(&self, product_id: ProductId) -> Outcome {
        let operation = Operation::RemoveProduct;
        metrics::counter!("cart_operations_total", "operation" => operation.as_str()).increment(1);

        let mut state = self.state.lock().await;
        let planned = state.cart.remove_product(product_id);
        match planned {
            Ok(events) => self.commit(operation, &mut state, events).await,
            Err(err) => self.reject(operation, err.into()),
        }
    }

    /// Sets the amount of a product already in the cart.
    ///
    /// An amount below 1 is ignored without a stock lookup or notification.
    #[tracing::instrument(skip(self))]
    pub async fn update_product_amount(&self, product_id: ProductId, amount: u32) -> Outcome {
        let operation = Operation::UpdateAmount;
        metrics::counter!("cart_operations_total", "operation" => operation.as_str()).increment(1);

        let mut state = self.state.lock().await;
        let planned = self.plan_update(&state.cart, product_id, amount).await;
        match planned {
            Ok(events) => self.commit(operation, &mut state, events).await,
            Err(err) => self.reject(operation, err),
        }
    }

    /// Removes every line, e.g. after checkout.
    #[tracing::instrument(skip(self))]
    pub async fn clear(&self) -> Outcome {
        let operation = Operation::Clear;
        metrics::counter!("cart_operations_total", "operation" => operation.as_str()).increment(1);

        let mut state = self.state.lock().await;
        let events = state.cart.clear();
        self.commit(operation, &mut state, events).await
    }

    async fn plan_add(
        &self,
        cart: &Cart,
        product_id: ProductId,
    ) -> Result<Vec<CartEvent>, OperationError> {
        let stock = self.fetch_stock(product_id).await?;

        match cart.plan_add(product_id, &stock)? {
            AddPlan::Increment(events) => Ok(events),
            AddPlan::NeedsProduct => {
                let product = self.fetch_product(product_id).await?;
                Ok(cart.add_new_item(product)?)
            }
        }
    }

    async fn plan_update(
        &self,
        cart: &Cart,
        product_id: ProductId,
        amount: u32,
    ) -> Result<Vec<CartEvent>, OperationError> {
        cart.require_item(product_id)?;

        if amount < 1 {
            tracing::debug!(amount, "ignoring amount below 1");
            return Ok(vec![]);
        }

        let stock = self.fetch_stock(product_id).await?;
        Ok(cart.update_amount(product_id, amount, &stock)?)
    }

    /// Applies `events` to a copy of the cart, persists it, then publishes.
    ///
    /// No events means nothing to do.
    async fn commit(
        &self,
        operation: Operation,
        state: &mut StoreState,
        events: Vec<CartEvent>,
    ) -> Outcome {
        if events.is_empty() {
            return Outcome::Unchanged;
        }

        let mut next = state.cart.clone();
        next.apply_events(events);

        if let Err(err) = self.repository.save(&next).await {
            metrics::counter!("cart_persist_failures").increment(1);
            return self.reject(operation, err.into());
        }

        state.cart = next;
        state.version += 1;

        let snapshot = CartSnapshot::new(state.cart.clone(), state.version);
        self.snapshots.send_replace(snapshot.clone());

        tracing::info!(
            %operation,
            version = state.version,
            items = state.cart.len(),
            total_quantity = state.cart.total_quantity(),
            "cart updated"
        );

        Outcome::Applied(snapshot)
    }

    fn reject(&self, operation: Operation, err: OperationError) -> Outcome {
        metrics::counter!(
            "cart_operations_rejected",
            "operation" => operation.as_str(),
            "reason" => err.reason()
        )
        .increment(1);
        tracing::warn!(%operation, reason = err.reason(), error = %err, "cart operation rejected");

        self.notifier.report_error(err.message(operation));
        Outcome::Rejected(err)
    }

    async fn fetch_stock(&self, product_id: ProductId) -> Result<StockLevel, OperationError> {
        let started = Instant::now();
        let result = self.stock.get_stock(product_id).await;
        metrics::histogram!("cart_remote_fetch_seconds", "service" => "stock")
            .record(started.elapsed().as_secs_f64());

        result.map_err(OperationError::Stock)
    }

    async fn fetch_product(&self, product_id: ProductId) -> Result<Product, OperationError> {
        let started = Instant::now();
        let result = self.catalog.get_product(product_id).await;
        metrics::histogram!("cart_remote_fetch_seconds", "service" => "catalog")
            .record(started.elapsed().as_secs_f64());

        result.map_err(OperationError::Catalog)
    }
}
