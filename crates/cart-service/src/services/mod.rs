//! External collaborators of the cart store and their in-memory implementations.

pub mod catalog;
pub mod notifier;
pub mod stock;

pub use catalog::{Catalog, InMemoryCatalog};
pub use notifier::{NotificationSink, RecordingNotifier, TracingNotifier};
pub use stock::{InMemoryStockClient, StockClient};
