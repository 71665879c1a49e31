//! Core MemStore implementation.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ExplorerError, ExplorerResult};
use crate::path;
use crate::store::FileStore;
use crate::types::{ChangeSet, FileMap, FileRecord};

/// In-memory file map with an active-file pointer
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    files: Arc<RwLock<FileMap>>,
    active: Arc<RwLock<Option<String>>>,
}

impl MemStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `files`, keys normalized
    pub fn with_files(files: FileMap) -> Self {
        let files = files
            .into_iter()
            .map(|(k, v)| (path::normalize(&k), v))
            .collect();

        Self {
            files: Arc::new(RwLock::new(files)),
            active: Arc::new(RwLock::new(None)),
        }
    }

    /// Clone of the current map
    pub async fn snapshot(&self) -> FileMap {
        self.files.read().await.clone()
    }
}

#[async_trait::async_trait]
impl FileStore for MemStore {
    async fn read(&self) -> ExplorerResult<FileMap> {
        Ok(self.snapshot().await)
    }

    async fn write(&self, path: &str, record: FileRecord) -> ExplorerResult<()> {
        let path = path::normalize(path);
        if path == "/" {
            return Err(ExplorerError::InvalidName("/".into()));
        }
        self.files.write().await.insert(path, record);
        Ok(())
    }

    async fn remove(&self, path: &str) -> ExplorerResult<()> {
        let path = path::normalize(path);
        let mut files = self.files.write().await;
        files
            .remove(&path)
            .ok_or_else(|| ExplorerError::NotFound(path.clone()))?;
        drop(files);

        let mut active = self.active.write().await;
        if active.as_deref() == Some(path.as_str()) {
            *active = None;
        }
        Ok(())
    }

    async fn open(&self, path: &str) -> ExplorerResult<()> {
        let path = path::normalize(path);
        if !self.files.read().await.contains_key(&path) {
            return Err(ExplorerError::NotFound(path));
        }
        *self.active.write().await = Some(path);
        Ok(())
    }

    async fn active(&self) -> ExplorerResult<Option<String>> {
        Ok(self.active.read().await.clone())
    }

    async fn apply(&self, changes: &ChangeSet) -> ExplorerResult<()> {
        let mut files = self.files.write().await;

        // Validate against a staged copy so the live map is swapped in one step
        let mut staged = files.clone();
        changes.apply_to(&mut staged)?;
        *files = staged;

        let mut active = self.active.write().await;
        let stale = active
            .as_deref()
            .is_some_and(|current| !files.contains_key(current));
        if stale {
            *active = None;
        }

        tracing::debug!(changes = changes.len(), "applied batch");
        Ok(())
    }
}
