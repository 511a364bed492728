//! File-backed key/value store.
//!
//! Entries are cached in memory. Every change re-reads the file under its
//! write lock, applies the one key and rewrites it atomically, so handles
//! sharing a file never drop each other's keys.

use super::snapshot::JsonSnapshot;
use async_trait::async_trait;
use ide_core::storage::KeyValueStore;
use ide_core::{IdeError, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

type Entries = BTreeMap<String, String>;

/// [`KeyValueStore`] persisted as a JSON object on disk.
///
/// # Example
///
/// ```ignore
/// use ide_infrastructure::JsonFileKeyValueStore;
///
/// let store = JsonFileKeyValueStore::open_default()?;
/// store.set("editor-theme", "monokai".to_string()).await?;
/// ```
#[derive(Clone)]
pub struct JsonFileKeyValueStore {
    /// Cached entries. Held for the whole write and only updated once the
    /// file holds the change.
    entries: Arc<Mutex<Entries>>,
    file: Arc<JsonSnapshot<Entries>>,
}

impl JsonFileKeyValueStore {
    /// Opens the store at `path`, loading existing entries.
    ///
    /// A missing or empty file starts an empty store. A corrupt file is
    /// reported as an error rather than silently discarded.
    pub fn open(path: PathBuf) -> Result<Self> {
        let file = JsonSnapshot::<Entries>::new(path);
        let entries = file.read()?.unwrap_or_default();

        tracing::debug!(
            "Opened key/value store at {:?} ({} entries)",
            file.path(),
            entries.len()
        );

        Ok(Self {
            entries: Arc::new(Mutex::new(entries)),
            file: Arc::new(file),
        })
    }

    /// Opens the store at the default location under the data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::paths::storage_file()?)
    }

    async fn apply<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Entries) + Send + 'static,
    {
        let mut entries = self.entries.lock().await;
        let file = self.file.clone();
        let merged = tokio::task::spawn_blocking(move || file.update(change))
            .await
            .map_err(|e| IdeError::storage(format!("Failed to join task: {}", e)))??;
        *entries = merged;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let key = key.to_string();
        self.apply(move |entries| {
            entries.insert(key, value);
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.apply(move |entries| {
            entries.remove(&key);
        })
        .await
    }
}
