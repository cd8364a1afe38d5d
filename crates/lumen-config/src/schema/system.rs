//! System configuration types: storage and logging.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persistent store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Store file path. `None` uses `{data_dir}/lumen/store.json`.
    pub path: Option<PathBuf>,
    /// Reload the store when another process writes it.
    pub watch: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            watch: true,
        }
    }
}

impl StorageConfig {
    /// Resolve the store file path, falling back to the platform data dir.
    pub fn resolve_path(&self) -> Option<PathBuf> {
        self.path
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("lumen").join("store.json")))
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `tracing-subscriber` filter directive for Lumen's crates.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "lumen=trace",
            LogLevel::Debug => "lumen=debug",
            LogLevel::Info => "lumen=info",
            LogLevel::Warn => "lumen=warn",
            LogLevel::Error => "lumen=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
