//! Key-value storage backends.
//!
//! A backend holds opaque string values under string keys, the same shape
//! as browser local storage. Two implementations are provided:
//! - [`MemoryStorage`]: process-local; clones share the same slots, so several
//!   contexts can observe each other's writes.
//! - [`FileStorage`]: one `<key>.json` file per slot inside a data directory.

use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Persistent key-value slots.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read a slot; `None` when it was never written or has been removed
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the whole value of a slot
    async fn set(&self, key: &str, value: String) -> StoreResult<()>;

    /// Remove a slot; removing an absent slot is not an error
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

/// In-memory storage shared by every clone.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.slots.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        self.slots.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.slots.write().await.remove(key);
        Ok(())
    }
}

/// File-backed storage: one JSON document per key.
///
/// Writes go to a uniquely named temporary sibling first and are renamed
/// into place, so a reader never sees a half-written slot.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (or create) a storage directory.
    pub async fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        tracing::info!(path = %dir.display(), "opened file storage");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.slot_path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        let path = self.slot_path(key)?;
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || -> StoreResult<()> {
            // Unique temp name per write; concurrent writers never share one
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(value.as_bytes())?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("write task failed: {}", e)))?
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.slot_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
