//! Core TOML config loading: read from path or platform default.

use crate::schema::LumenConfig;
use lumen_common::ConfigError;
use std::path::Path;
use tracing::info;

use super::paths::default_config_path;

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields.
/// Validation is left to the caller.
pub fn load_from_path(path: &Path) -> Result<LumenConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: LumenConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On Linux: `~/.config/lumen/config.toml`
///
/// A missing file yields the compiled-in defaults. Unlike a parse error,
/// this is the normal case for a fresh install.
pub fn load_default() -> Result<LumenConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config at {}, using built-in defaults", path.display());
            Ok(LumenConfig::default())
        }
        Err(e) => Err(e),
    }
}
