//! File explorer session over a [`FileStore`].
//!
//! Each operation takes a fresh snapshot from the store, plans the change
//! with [`crate::ops`], and hands the whole batch to [`FileStore::apply`].
//! The explorer itself only owns session state: the clipboard and pending
//! notices.

use std::mem;

use crate::config::ExplorerConfig;
use crate::error::{ExplorerError, ExplorerResult};
use crate::ops;
use crate::path;
use crate::store::FileStore;
use crate::tree::{self, Tree};
use crate::types::{ChangeSet, Clipboard, ClipboardMode, FileMap, FileRecord, Notice};

pub struct Explorer<S: FileStore> {
    store: S,
    config: ExplorerConfig,
    clipboard: Option<Clipboard>,
    notices: Vec<Notice>,
}

impl<S: FileStore> Explorer<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, ExplorerConfig::default())
    }

    pub fn with_config(store: S, config: ExplorerConfig) -> Self {
        Self {
            store,
            config,
            clipboard: None,
            notices: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Tree of the current file map. Rebuilt on every call.
    pub async fn tree(&self) -> ExplorerResult<Tree> {
        let files = self.store.read().await?;
        Ok(tree::build_tree(&files))
    }

    /// Drain pending notices.
    pub fn notices(&mut self) -> Vec<Notice> {
        mem::take(&mut self.notices)
    }

    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    pub fn clear_clipboard(&mut self) {
        self.clipboard = None;
    }

    pub fn copy(&mut self, path: &str) {
        self.clipboard = Some(Clipboard {
            mode: ClipboardMode::Copy,
            path: path::normalize(path),
        });
    }

    pub fn cut(&mut self, path: &str) {
        self.clipboard = Some(Clipboard {
            mode: ClipboardMode::Cut,
            path: path::normalize(path),
        });
    }

    /// Create a file at `path`, or at a free sibling name if it is taken.
    /// Returns the path actually written.
    pub async fn create_file(&mut self, path: &str, code: &str) -> ExplorerResult<String> {
        let result = self.create_file_inner(path, code).await;
        self.report(result, |p| format!("Created {}", p))
    }

    async fn create_file_inner(&mut self, path: &str, code: &str) -> ExplorerResult<String> {
        let files = self.store.read().await?;
        let target = Self::free_path(&files, path, &self.config)?;

        let mut changes = ChangeSet::new();
        changes.write(target.clone(), FileRecord::new(code));
        self.store.apply(&changes).await?;

        if self.config.open_created {
            self.store.open(&target).await?;
        }
        Ok(target)
    }

    /// Materialize a folder by writing the configured placeholder file in it.
    /// Returns the folder path actually used.
    pub async fn create_folder(&mut self, path: &str) -> ExplorerResult<String> {
        let result = self.create_folder_inner(path).await;
        self.report(result, |p| format!("Created folder {}", p))
    }

    async fn create_folder_inner(&mut self, path: &str) -> ExplorerResult<String> {
        let files = self.store.read().await?;
        let folder = Self::free_path(&files, path, &self.config)?;

        let mut changes = ChangeSet::new();
        changes.write(
            path::join(&folder, &self.config.folder_placeholder),
            FileRecord::default(),
        );
        self.store.apply(&changes).await?;
        Ok(folder)
    }

    /// Rename the file or folder at `path` within its parent directory.
    pub async fn rename(&mut self, path: &str, new_name: &str) -> ExplorerResult<String> {
        let result = self.rename_inner(path, new_name).await;
        self.report(result, |p| format!("Renamed to {}", p))
    }

    async fn rename_inner(&mut self, path: &str, new_name: &str) -> ExplorerResult<String> {
        ops::validate_name(new_name)?;
        let source = path::normalize(path);
        let target = path::join(&path::parent(&source), new_name);
        self.relocate(&source, &target).await
    }

    /// Move `source` into the folder `dest_dir`. A file destination means its
    /// parent folder.
    pub async fn move_into(&mut self, source: &str, dest_dir: &str) -> ExplorerResult<String> {
        let result = self.move_into_inner(source, dest_dir).await;
        self.report(result, |p| format!("Moved to {}", p))
    }

    async fn move_into_inner(&mut self, source: &str, dest_dir: &str) -> ExplorerResult<String> {
        let source = path::normalize(source);
        let files = self.store.read().await?;
        let dest_dir = Self::resolve_dir(&files, dest_dir);

        if source == "/" {
            return Err(ExplorerError::RootProtected);
        }
        if path::is_within(&dest_dir, &source) {
            tracing::warn!(%source, %dest_dir, "refusing to move a folder into itself");
            return Err(ExplorerError::MoveIntoSelf {
                path: source,
                target: dest_dir,
            });
        }

        let target = path::join(&dest_dir, &path::file_name(&source));
        self.relocate(&source, &target).await
    }

    /// Copy `source` into the folder `dest_dir`, picking a free name.
    pub async fn copy_into(&mut self, source: &str, dest_dir: &str) -> ExplorerResult<String> {
        let result = self.copy_into_inner(source, dest_dir).await;
        self.report(result, |p| format!("Copied to {}", p))
    }

    async fn copy_into_inner(&mut self, source: &str, dest_dir: &str) -> ExplorerResult<String> {
        let source = path::normalize(source);
        let files = self.store.read().await?;
        if !ops::exists(&files, &source) {
            return Err(ExplorerError::NotFound(source));
        }

        let dest_dir = Self::resolve_dir(&files, dest_dir);
        let target = ops::unique_path(
            &files,
            &path::join(&dest_dir, &path::file_name(&source)),
            &self.config.copy_label,
        );

        let changes = ops::plan_copy(&files, &source, &target)?;
        self.store.apply(&changes).await?;
        tracing::info!(%source, %target, files = changes.len(), "copied");
        Ok(target)
    }

    /// Delete `path` and everything under it. Returns the number of files removed.
    pub async fn delete(&mut self, path: &str) -> ExplorerResult<usize> {
        let result = self.delete_inner(path).await;
        self.report(result, |n| format!("Deleted {} file(s)", n))
    }

    async fn delete_inner(&mut self, path: &str) -> ExplorerResult<usize> {
        let target = path::normalize(path);
        let files = self.store.read().await?;
        let changes = ops::plan_delete(&files, &target)?;
        self.store.apply(&changes).await?;

        if self
            .clipboard
            .as_ref()
            .is_some_and(|clip| path::is_within(&clip.path, &target))
        {
            self.clipboard = None;
        }

        tracing::info!(%target, files = changes.len(), "deleted");
        Ok(changes.len())
    }

    /// Paste the clipboard into `dest_dir`. Returns `None` when the clipboard
    /// is empty. A cut is consumed by a successful paste; a copy is kept.
    pub async fn paste(&mut self, dest_dir: &str) -> ExplorerResult<Option<String>> {
        let Some(clip) = self.clipboard.clone() else {
            return Ok(None);
        };

        let pasted = match clip.mode {
            ClipboardMode::Copy => self.copy_into(&clip.path, dest_dir).await?,
            ClipboardMode::Cut => {
                let moved = self.move_into(&clip.path, dest_dir).await?;
                self.clipboard = None;
                moved
            }
        };
        Ok(Some(pasted))
    }

    /// Move `source` to `target` in one batch, keeping the active file open
    /// at its new location.
    async fn relocate(&mut self, source: &str, target: &str) -> ExplorerResult<String> {
        let files = self.store.read().await?;
        if !ops::exists(&files, source) {
            return Err(ExplorerError::NotFound(source.to_string()));
        }
        if path::canonical(source) == path::canonical(target) {
            return Ok(source.to_string());
        }

        let target = ops::unique_path(&files, target, &self.config.copy_label);
        let changes = ops::plan_move(&files, source, &target)?;
        let active = self.store.active().await?;
        self.store.apply(&changes).await?;

        if let Some(active) = active.filter(|a| path::is_within(a, source)) {
            self.store
                .open(&path::rebase(&active, source, &target))
                .await?;
        }
        if let Some(clip) = self.clipboard.as_mut() {
            if path::is_within(&clip.path, source) {
                clip.path = path::rebase(&clip.path, source, &target);
            }
        }

        tracing::info!(%source, %target, changes = changes.len(), "moved");
        Ok(target)
    }

    fn free_path(files: &FileMap, path: &str, config: &ExplorerConfig) -> ExplorerResult<String> {
        let target = path::normalize(path);
        if target == "/" {
            return Err(ExplorerError::InvalidName(path.to_string()));
        }
        for segment in path::segments(&target) {
            ops::validate_name(&segment)?;
        }
        Ok(ops::unique_path(files, &target, &config.copy_label))
    }

    fn resolve_dir(files: &FileMap, dest: &str) -> String {
        let dest = path::normalize(dest);
        if ops::is_file(files, &dest) && !ops::is_folder(files, &dest) {
            path::parent(&dest)
        } else {
            dest
        }
    }

    fn report<T>(
        &mut self,
        result: ExplorerResult<T>,
        describe: impl FnOnce(&T) -> String,
    ) -> ExplorerResult<T> {
        match &result {
            Ok(value) => self.notices.push(Notice::info(describe(value))),
            Err(err) => self.notices.push(Notice::error(err.to_string())),
        }
        result
    }
}
