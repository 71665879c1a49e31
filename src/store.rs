use crate::error::{ExplorerError, ExplorerResult};
use crate::types::{Change, ChangeSet, FileMap, FileRecord};

/// The externally owned file map the explorer works against.
///
/// Implementors only need `read`, `write` and `remove`. The provided
/// `apply` writes a batch key by key and restores the previous records if
/// any step fails; stores that can do better should override it.
#[async_trait::async_trait]
pub trait FileStore: Send + Sync + 'static {
    /// Snapshot of the whole file map.
    async fn read(&self) -> ExplorerResult<FileMap>;

    async fn write(&self, path: &str, record: FileRecord) -> ExplorerResult<()>;

    async fn remove(&self, path: &str) -> ExplorerResult<()>;

    /// Make `path` the file shown in the editor.
    async fn open(&self, _path: &str) -> ExplorerResult<()> {
        Ok(())
    }

    /// Path of the file currently shown in the editor, if tracked.
    async fn active(&self) -> ExplorerResult<Option<String>> {
        Ok(None)
    }

    async fn apply(&self, changes: &ChangeSet) -> ExplorerResult<()> {
        let before = self.read().await?;
        let mut applied = 0;

        for change in changes.iter() {
            let result = match change {
                Change::Write { path, record } => self.write(path, record.clone()).await,
                Change::Remove { path } => self.remove(path).await,
            };

            if let Err(err) = result {
                tracing::warn!(applied, error = %err, "batch failed, rolling back");
                return match rollback(self, &before, &changes.changes[..applied]).await {
                    Ok(()) => Err(err),
                    Err(rollback_err) => Err(ExplorerError::PartialApply {
                        applied,
                        reason: format!("{}; rollback failed: {}", err, rollback_err),
                    }),
                };
            }
            applied += 1;
        }

        Ok(())
    }
}

/// Undo `applied` in reverse order, restoring each touched key from `before`.
async fn rollback<S: FileStore + ?Sized>(
    store: &S,
    before: &FileMap,
    applied: &[Change],
) -> ExplorerResult<()> {
    for change in applied.iter().rev() {
        let path = change.path();
        match before.get(path) {
            Some(record) => store.write(path, record.clone()).await?,
            None => store.remove(path).await?,
        }
    }
    Ok(())
}
