//! Cart persistence adapter.

use cart_storage::{KeyValueStore, Result, Slot};
use domain::Cart;

/// Storage key the storefront has always used for the cart.
pub const DEFAULT_CART_KEY: &str = "@RocketShoes:cart";

/// Loads and saves the cart in one key-value slot.
///
/// The slot holds a plain JSON array of line items.
pub struct CartRepository<S> {
    slot: Slot<S, Cart>,
}

impl<S: KeyValueStore> CartRepository<S> {
    /// Creates a repository at the default key.
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_CART_KEY)
    }

    /// Creates a repository at a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            slot: Slot::new(store, key),
        }
    }

    /// Returns the storage key.
    pub fn key(&self) -> &str {
        self.slot.key()
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        self.slot.store()
    }

    /// Loads the persisted cart; an absent slot is an empty cart.
    ///
    /// Zero-amount and duplicate lines in stored data are dropped.
    pub async fn load(&self) -> Result<Cart> {
        let stored = self.slot.load().await?.unwrap_or_default();
        Ok(Cart::from_items(stored.into_items()))
    }

    /// Replaces the persisted cart.
    pub async fn save(&self, cart: &Cart) -> Result<()> {
        self.slot.save(cart).await
    }

    /// Deletes the persisted cart.
    pub async fn clear(&self) -> Result<()> {
        self.slot.clear().await
    }
}
