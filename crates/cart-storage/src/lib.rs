//! Key-value slot persistence.
//!
//! A cart is persisted as one serialized value stored under a well-known
//! key, the same way a browser keeps it in local storage. This crate
//! provides the storage trait, several backends and a typed view of a
//! single slot.

pub mod error;
pub mod file;
pub mod memory;
pub mod postgres;
pub mod slot;
pub mod store;

pub use error::{Result, StorageError};
pub use file::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
pub use postgres::PostgresKeyValueStore;
pub use slot::Slot;
pub use store::{KeyValueStore, KeyValueStoreExt};
