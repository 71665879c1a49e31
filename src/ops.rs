//! Planners for file operations over a file map snapshot.
//!
//! Nothing here touches a store: each planner reads a [`FileMap`] and returns
//! the [`ChangeSet`] that would carry out the operation, so the caller can
//! apply it as one batch.

use std::collections::HashSet;

use crate::error::{ExplorerError, ExplorerResult};
use crate::path;
use crate::types::{ChangeSet, FileMap, FileRecord};

pub const DEFAULT_COPY_LABEL: &str = "copy";

/// True when some key lies strictly under `target`.
///
/// Keys are matched by their segments, so raw store keys such as `x.txt` or
/// `/a//b.js` resolve the same way their tree nodes do.
pub fn is_folder(files: &FileMap, target: &str) -> bool {
    let target = path::segments(target);
    files.keys().any(|key| {
        let key = path::segments(key);
        key.len() > target.len() && key.starts_with(&target)
    })
}

/// True when some key names exactly `target`.
pub fn is_file(files: &FileMap, target: &str) -> bool {
    let target = path::canonical(target);
    files.keys().any(|key| path::canonical(key) == target)
}

/// True when `target` is a file key or a folder.
pub fn exists(files: &FileMap, target: &str) -> bool {
    is_file(files, target) || is_folder(files, target)
}

/// Every key equal to or nested under `target`.
pub fn keys_under(files: &FileMap, target: &str) -> Vec<String> {
    let target = path::normalize(target);
    files
        .keys()
        .filter(|key| path::is_within(key, &target))
        .cloned()
        .collect()
}

/// Resolve a free path near `target`.
///
/// An occupied `/x.txt` becomes `/x (copy).txt`, then `/x (copy 2).txt`,
/// `/x (copy 3).txt` and so on.
pub fn unique_path(files: &FileMap, target: &str, label: &str) -> String {
    let target = path::normalize(target);
    if target == "/" || !exists(files, &target) {
        return target;
    }

    let dir = path::parent(&target);
    let name = path::file_name(&target);
    let (stem, ext) = path::split_extension(&name);

    let mut n = 1usize;
    loop {
        let suffix = if n == 1 {
            format!(" ({})", label)
        } else {
            format!(" ({} {})", label, n)
        };
        let candidate_name = match ext {
            Some(ext) => format!("{}{}.{}", stem, suffix, ext),
            None => format!("{}{}", stem, suffix),
        };
        let candidate = path::join(&dir, &candidate_name);
        if !exists(files, &candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Records at and under `source`, keyed by their rebased path under `target`.
fn relocated(
    files: &FileMap,
    source: &str,
    target: &str,
) -> ExplorerResult<Vec<(String, String, FileRecord)>> {
    let moved: Vec<_> = files
        .iter()
        .filter(|(key, _)| path::is_within(key, source))
        .map(|(key, record)| {
            (
                key.clone(),
                path::rebase(key, source, target),
                record.clone(),
            )
        })
        .collect();

    if moved.is_empty() {
        return Err(ExplorerError::NotFound(source.to_string()));
    }
    Ok(moved)
}

/// Plan moving `source` (file or folder) to the exact path `target`.
pub fn plan_move(files: &FileMap, source: &str, target: &str) -> ExplorerResult<ChangeSet> {
    let source = path::normalize(source);
    let target = path::normalize(target);

    if source == "/" {
        return Err(ExplorerError::RootProtected);
    }
    if path::is_within(&target, &source) {
        tracing::warn!(%source, %target, "refusing to move a path into itself");
        return Err(ExplorerError::MoveIntoSelf {
            path: source,
            target,
        });
    }

    let moved = relocated(files, &source, &target)?;
    let mut changes = ChangeSet::new();
    for (_, new_key, record) in &moved {
        changes.write(new_key.clone(), record.clone());
    }
    // Moving onto an ancestor can rewrite one source key onto another
    let written: HashSet<&str> = moved
        .iter()
        .map(|(_, new_key, _)| new_key.as_str())
        .collect();
    for (old_key, _, _) in &moved {
        if !written.contains(old_key.as_str()) {
            changes.remove(old_key.clone());
        }
    }

    tracing::debug!(%source, %target, changes = changes.len(), "planned move");
    Ok(changes)
}

/// Plan copying `source` to the exact path `target`. The source is kept.
pub fn plan_copy(files: &FileMap, source: &str, target: &str) -> ExplorerResult<ChangeSet> {
    let source = path::normalize(source);
    let target = path::normalize(target);

    if source == "/" || target == "/" {
        return Err(ExplorerError::RootProtected);
    }

    let mut changes = ChangeSet::new();
    for (_, new_key, record) in relocated(files, &source, &target)? {
        changes.write(new_key, record);
    }

    tracing::debug!(%source, %target, changes = changes.len(), "planned copy");
    Ok(changes)
}

/// Plan removing `target` and everything under it.
pub fn plan_delete(files: &FileMap, target: &str) -> ExplorerResult<ChangeSet> {
    let target = path::normalize(target);
    if target == "/" {
        return Err(ExplorerError::RootProtected);
    }

    let keys = keys_under(files, &target);
    if keys.is_empty() {
        return Err(ExplorerError::NotFound(target));
    }

    let mut changes = ChangeSet::new();
    for key in keys {
        changes.remove(key);
    }
    Ok(changes)
}

/// Validate a single path segment supplied by the user.
pub fn validate_name(name: &str) -> ExplorerResult<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(ExplorerError::InvalidName(name.to_string()));
    }
    Ok(())
}
