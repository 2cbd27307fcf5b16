//! Key-value storage capability used for the persisted color cache.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::StoreError;

/// Asynchronous string key-value storage.
///
/// Implementations must be `Send + Sync` so a single store can be owned
/// by a background task.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a value, `None` if the key was never written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the value stored under a key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be written.
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// In-process store, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one entry.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
        store
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a single JSON object file (`{key: value}`).
///
/// Writes go to a sibling temporary file that is renamed into place. A
/// file that no longer parses is replaced by the next write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    /// Uses (and lazily creates) the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = match self.read_all().await {
            Ok(entries) => entries,
            Err(StoreError::Json(e)) => {
                log::warn!("Replacing unreadable store {}: {e}", self.path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(&entries)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        log::debug!("Wrote {} keys to {}", entries.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get("k").await.unwrap().is_none());
        store.set("k", "v".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.get("anything").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_store_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let store = JsonFileStore::new(&path);

        store.set("a", "1".to_string()).await.unwrap();
        store.set("b", "2".to_string()).await.unwrap();
        store.set("a", "3".to_string()).await.unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get("a").await.unwrap().as_deref(), Some("3"));
        assert_eq!(reopened.get("b").await.unwrap().as_deref(), Some("2"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.get("a").await, Err(StoreError::Json(_))));
    }

    #[tokio::test]
    async fn file_store_write_replaces_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{garbage").unwrap();
        let store = JsonFileStore::new(&path);

        store.set("a", "1".to_string()).await.unwrap();

        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get("a").await.unwrap().as_deref(), Some("1"));
    }
}
