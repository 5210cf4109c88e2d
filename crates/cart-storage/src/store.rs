use async_trait::async_trait;

use crate::Result;

/// Durable string-keyed storage for serialized values.
///
/// Each key holds a single value and writes replace it entirely. There is
/// no locking between writers: the last write wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or None if the slot is empty.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Removes the value stored under `key`.
    ///
    /// Removing an empty slot is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Extension trait providing convenience methods for key-value stores.
#[async_trait]
pub trait KeyValueStoreExt: KeyValueStore {
    /// Checks if a slot holds a value.
    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

// Blanket implementation for all KeyValueStore implementations
impl<T: KeyValueStore + ?Sized> KeyValueStoreExt for T {}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
}

/// Validates a slot key before it reaches a backend.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(crate::StorageError::Unavailable(
            "slot key must not be empty".to_string(),
        ));
    }
    Ok(())
}
