use crate::detection::DEFAULT_SUFFIX;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure, read from `.unitycheck.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UnitycheckConfig {
    #[serde(default)]
    pub scan: Option<ScanConfig>,

    #[serde(default)]
    pub cleanup: Option<CleanupConfig>,

    #[serde(default)]
    pub quarantine: Option<QuarantineConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanConfig {
    #[serde(default = "default_suffix")]
    pub candidate_suffix: String,

    #[serde(default = "default_suffix")]
    pub payload_suffix: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            candidate_suffix: default_suffix(),
            payload_suffix: default_suffix(),
        }
    }
}

/// When temporary artifacts are removed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CleanupMode {
    /// Once, after every candidate has been processed
    #[default]
    Deferred,
    /// After each candidate; bounds disk usage on large trees
    Immediate,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CleanupConfig {
    #[serde(default)]
    pub mode: CleanupMode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuarantineConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Relative paths resolve against the working directory
    #[serde(default = "default_quarantine_dir")]
    pub directory: PathBuf,
}

impl Default for QuarantineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: default_quarantine_dir(),
        }
    }
}

pub const DEFAULT_QUARANTINE_DIR: &str = "corrupted";

fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

fn default_true() -> bool {
    true
}

fn default_quarantine_dir() -> PathBuf {
    PathBuf::from(DEFAULT_QUARANTINE_DIR)
}
