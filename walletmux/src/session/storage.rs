//! Session record storage backends.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::record::{Entries, SessionRecord};
use crate::error::StorageResult;

/// Persistence for the session record.
///
/// Only the connection controller writes through this trait.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the record. Missing entries read as "no prior session".
    async fn read(&self) -> StorageResult<SessionRecord>;

    /// Write the record.
    async fn write(&self, record: &SessionRecord) -> StorageResult<()>;

    /// Mark the session signed out and forget the provider.
    async fn clear(&self) -> StorageResult<()> {
        self.write(&SessionRecord::signed_out()).await
    }
}

/// In-memory store.
///
/// Not persistent across restarts.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<Entries>,
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `record`.
    ///
    /// # Panics
    ///
    /// Panics if the auth entry cannot be serialized.
    #[must_use]
    pub fn with_record(record: &SessionRecord) -> Self {
        let mut entries = Entries::new();
        record
            .encode_into(&mut entries)
            .expect("session record serializes");
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Set a raw entry, bypassing validation.
    pub async fn set_raw(&self, key: &str, value: impl Into<String>) {
        self.entries.write().await.insert(key.to_owned(), value.into());
    }

    /// Read a raw entry.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn read(&self) -> StorageResult<SessionRecord> {
        SessionRecord::decode(&*self.entries.read().await)
    }

    async fn write(&self, record: &SessionRecord) -> StorageResult<()> {
        record.encode_into(&mut *self.entries.write().await)
    }
}

/// File-backed store.
///
/// Keeps both entries in one JSON object file, the way a browser's local
/// storage would hold them.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileSessionStore {
    /// Create a store at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    /// Default location (~/.walletmux/session.json).
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs_next::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".walletmux")
            .join("session.json")
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_entries(&self) -> StorageResult<Entries> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn store_entries(&self, entries: &Entries) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, content).await?;
        debug!(path = %self.path.display(), "session record saved");
        Ok(())
    }
}

impl Default for FileSessionStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn read(&self) -> StorageResult<SessionRecord> {
        let _guard = self.lock.read().await;
        let entries = self.load_entries().await?;
        SessionRecord::decode(&entries)
    }

    async fn write(&self, record: &SessionRecord) -> StorageResult<()> {
        let _guard = self.lock.write().await;
        // Unreadable contents are replaced rather than merged.
        let mut entries = self.load_entries().await.unwrap_or_default();
        record.encode_into(&mut entries)?;
        self.store_entries(&entries).await
    }
}
