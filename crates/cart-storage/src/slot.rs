use std::marker::PhantomData;

use serde::{Serialize, de::DeserializeOwned};

use crate::{KeyValueStore, Result};

/// Typed JSON view of a single storage key.
///
/// The slot owns its store handle; backends are cheap to clone, so several
/// slots can share one store.
pub struct Slot<S, T> {
    store: S,
    key: String,
    _phantom: PhantomData<fn() -> T>,
}

impl<S, T> Slot<S, T>
where
    S: KeyValueStore,
    T: Serialize + DeserializeOwned,
{
    /// Creates a slot for `key` over `store`.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _phantom: PhantomData,
        }
    }

    /// Returns the slot key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads and decodes the slot value.
    ///
    /// Returns None if the slot is empty.
    pub async fn load(&self) -> Result<Option<T>> {
        match self.store.get(&self.key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encodes and stores `value`, replacing the previous one.
    pub async fn save(&self, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(&self.key, raw).await
    }

    /// Empties the slot.
    pub async fn clear(&self) -> Result<()> {
        self.store.remove(&self.key).await
    }
}
