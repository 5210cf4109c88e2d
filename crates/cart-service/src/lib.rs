//! Cart store for the storefront.
//!
//! The [`CartStore`] owns the shopper's cart and is the only place it
//! changes. Each operation may consult the remote stock and catalog
//! collaborators, then applies its change all-or-nothing: the new cart is
//! persisted through the [`CartRepository`] and published to subscribers,
//! or the cart stays as it was and a localized message goes to the
//! [`NotificationSink`].

pub mod error;
pub mod messages;
pub mod repository;
pub mod services;
pub mod store;

pub use error::{OperationError, ServiceError};
pub use messages::Operation;
pub use repository::{CartRepository, DEFAULT_CART_KEY};
pub use services::{
    Catalog, InMemoryCatalog, InMemoryStockClient, NotificationSink, RecordingNotifier,
    StockClient, TracingNotifier,
};
pub use store::{CartSnapshot, CartStore, Outcome};
