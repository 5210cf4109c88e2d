use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{KeyValueStore, Result, StorageError, store::validate_key};

/// In-memory key-value store.
///
/// Clones share the same slots, so a store handed to a repository can
/// still be inspected by the test that created it.
#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    slots: Arc<RwLock<HashMap<String, String>>>,
    fail_on_write: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryKeyValueStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with one slot already populated.
    pub fn with_slot(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut slots = HashMap::new();
        slots.insert(key.into(), value.into());
        Self {
            slots: Arc::new(RwLock::new(slots)),
            ..Self::default()
        }
    }

    /// Configures the store to fail every subsequent write.
    pub fn set_fail_on_write(&self, fail: bool) {
        self.fail_on_write.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of successful writes (`set` and `remove`).
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Returns the number of populated slots.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    /// Returns true if no slot is populated.
    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_on_write.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("write rejected".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.slots.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        validate_key(key)?;
        self.check_writable()?;
        self.slots.write().await.insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.check_writable()?;
        self.slots.write().await.remove(key);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyValueStoreExt;

    #[tokio::test]
    async fn set_and_get() {
        let store = InMemoryKeyValueStore::new();
        store.set("cart", "[]".to_string()).await.unwrap();

        assert_eq!(store.get("cart").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn missing_slot_is_none() {
        let store = InMemoryKeyValueStore::new();
        assert!(store.get("cart").await.unwrap().is_none());
        assert!(!store.contains("cart").await.unwrap());
    }

    #[tokio::test]
    async fn last_write_wins() {
        let store = InMemoryKeyValueStore::new();
        store.set("cart", "first".to_string()).await.unwrap();
        store.set("cart", "second".to_string()).await.unwrap();

        assert_eq!(store.get("cart").await.unwrap().as_deref(), Some("second"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn clones_share_slots() {
        let store = InMemoryKeyValueStore::new();
        let other = store.clone();
        other.set("cart", "[]".to_string()).await.unwrap();

        assert!(store.contains("cart").await.unwrap());
    }

    #[tokio::test]
    async fn remove_clears_slot() {
        let store = InMemoryKeyValueStore::with_slot("cart", "[]");
        store.remove("cart").await.unwrap();
        store.remove("cart").await.unwrap();

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn fail_on_write_leaves_slot_untouched() {
        let store = InMemoryKeyValueStore::with_slot("cart", "old");
        store.set_fail_on_write(true);

        let result = store.set("cart", "new".to_string()).await;
        assert!(matches!(result, Err(StorageError::Unavailable(_))));
        assert_eq!(store.get("cart").await.unwrap().as_deref(), Some("old"));
        assert_eq!(store.write_count(), 0);
    }
}
