//! Core types shared by the store, the planners and the explorer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::SystemTime;

use crate::error::{ExplorerError, ExplorerResult};
use crate::path;

/// Flat map from absolute path to file record, as owned by the sandbox.
pub type FileMap = BTreeMap<String, FileRecord>;

/// A single sandbox file. Flags mirror the sandbox's JSON shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRecord", rename_all = "camelCase")]
pub struct FileRecord {
    pub code: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub active: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
}

impl FileRecord {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }
}

/// Accepts both `"/a.js": "code"` and `"/a.js": { "code": "..." }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRecord {
    Code(String),
    Full {
        code: String,
        #[serde(default)]
        hidden: bool,
        #[serde(default)]
        active: bool,
        #[serde(default, rename = "readOnly")]
        read_only: bool,
    },
}

impl From<RawRecord> for FileRecord {
    fn from(raw: RawRecord) -> Self {
        match raw {
            RawRecord::Code(code) => FileRecord::new(code),
            RawRecord::Full {
                code,
                hidden,
                active,
                read_only,
            } => FileRecord {
                code,
                hidden,
                active,
                read_only,
            },
        }
    }
}

/// One staged mutation of the file map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Change {
    Write { path: String, record: FileRecord },
    Remove { path: String },
}

impl Change {
    pub fn path(&self) -> &str {
        match self {
            Change::Write { path, .. } | Change::Remove { path } => path,
        }
    }
}

/// Ordered batch of changes, applied all-or-nothing by a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, path: impl Into<String>, record: FileRecord) {
        self.changes.push(Change::Write {
            path: path.into(),
            record,
        });
    }

    pub fn remove(&mut self, path: impl Into<String>) {
        self.changes.push(Change::Remove { path: path.into() });
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter()
    }

    /// Applies the batch to a plain map, keys normalized. Stops at the first
    /// write to the root or removal of an absent key, leaving `files` partly
    /// updated; callers that need all-or-nothing apply to a copy.
    pub fn apply_to(&self, files: &mut FileMap) -> ExplorerResult<()> {
        for change in &self.changes {
            match change {
                Change::Write { path, .. } if path::normalize(path) == "/" => {
                    return Err(ExplorerError::InvalidName("/".into()));
                }
                Change::Write { path, record } => {
                    files.insert(path::normalize(path), record.clone());
                }
                Change::Remove { path } => {
                    let path = path::normalize(path);
                    if files.remove(&path).is_none() {
                        return Err(ExplorerError::NotFound(path));
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardMode {
    Copy,
    Cut,
}

/// Transient clipboard of one explorer session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clipboard {
    pub mode: ClipboardMode,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-facing transient notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    #[serde(with = "serde_millis")]
    pub at: SystemTime,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            at: SystemTime::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            at: SystemTime::now(),
        }
    }
}
