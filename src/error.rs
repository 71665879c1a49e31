use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ExplorerError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("cannot move {path} into itself ({target})")]
    MoveIntoSelf { path: String, target: String },

    #[error("the root folder cannot be removed or moved")]
    RootProtected,

    #[error("store error: {0}")]
    Backend(String),

    // The batch failed and restoring the previous state failed too
    #[error("partial apply after {applied} changes: {reason}")]
    PartialApply { applied: usize, reason: String },

    #[error("config: {0}")]
    Config(String),

    // std::io::Error is stringified so it works with Serialize/Deserialize
    #[error("system I/O error: {0}")]
    SystemIo(String),
}

impl From<std::io::Error> for ExplorerError {
    fn from(e: std::io::Error) -> Self {
        ExplorerError::SystemIo(e.to_string())
    }
}

impl From<toml::de::Error> for ExplorerError {
    fn from(e: toml::de::Error) -> Self {
        ExplorerError::Config(e.to_string())
    }
}

pub type ExplorerResult<T> = Result<T, ExplorerError>;
