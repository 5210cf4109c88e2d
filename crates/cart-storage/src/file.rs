use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{KeyValueStore, Result, store::validate_key};

type Slots = BTreeMap<String, String>;

/// File-backed key-value store.
///
/// All slots live in one JSON object on disk. Writes go to a sibling
/// temporary file which is then renamed over the original, so a crash
/// mid-write leaves the previous contents intact. A missing file reads as
/// an empty store.
#[derive(Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileKeyValueStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file is not touched until the first read or write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_slots(&self) -> Result<Slots> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Slots::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Slots::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_slots(&self, slots: &Slots) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("tmp");
        let bytes = serde_json::to_vec_pretty(slots)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), slots = slots.len(), "slot file written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let mut slots = self.read_slots().await?;
        Ok(slots.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        validate_key(key)?;
        let _guard = self.write_lock.lock().await;

        let mut slots = self.read_slots().await?;
        slots.insert(key.to_string(), value);
        self.write_slots(&slots).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        let _guard = self.write_lock.lock().await;

        let mut slots = self.read_slots().await?;
        if slots.remove(key).is_some() {
            self.write_slots(&slots).await?;
        }
        Ok(())
    }
}
