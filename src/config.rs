//! Explorer configuration, read from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ExplorerResult;
use crate::ops::DEFAULT_COPY_LABEL;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Word used in ` (copy)`, ` (copy 2)` suffixes.
    pub copy_label: String,
    /// File written to materialize an otherwise empty folder.
    pub folder_placeholder: String,
    /// Open newly created files in the editor.
    pub open_created: bool,
    pub log: LogConfig,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            copy_label: DEFAULT_COPY_LABEL.to_string(),
            folder_placeholder: ".gitkeep".to_string(),
            open_created: true,
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, overridden by `SANDTREE_LOG`.
    pub filter: String,
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            ansi: true,
        }
    }
}

impl ExplorerConfig {
    pub fn from_toml_str(s: &str) -> ExplorerResult<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ExplorerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExplorerError;

    #[test]
    fn test_defaults_for_missing_keys() {
        let config = ExplorerConfig::from_toml_str("copy_label = \"kopie\"").unwrap();
        assert_eq!(config.copy_label, "kopie");
        assert_eq!(config.folder_placeholder, ".gitkeep");
        assert!(config.open_created);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_nested_log_table() {
        let config = ExplorerConfig::from_toml_str("[log]\nfilter = \"sandtree=debug\"\nansi = false\n")
            .unwrap();
        assert_eq!(config.log.filter, "sandtree=debug");
        assert!(!config.log.ansi);
        assert_eq!(config.copy_label, "copy");
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = ExplorerConfig::from_toml_str("copy_label = [").unwrap_err();
        assert!(matches!(err, ExplorerError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ExplorerConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ExplorerError::SystemIo(_)));
    }
}
