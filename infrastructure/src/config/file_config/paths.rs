//! Filesystem, batch and logging configuration from TOML
//! (`[paths]`, `[batch]` and `[logging]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where statement documents are read and audit files written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePathsConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for FilePathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("results"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBatchConfig {
    /// Companies audited at the same time
    pub concurrency: usize,
}

impl Default for FileBatchConfig {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

/// Log destinations; both are off unless set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of consensus rounds
    pub audit_log: Option<PathBuf>,
    /// Diagnostic log file (in addition to stderr)
    pub file: Option<PathBuf>,
}
