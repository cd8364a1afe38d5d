//! Where the config file lives, and writing the commented starter file.

use lumen_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::info;

use super::template::default_config_toml;

/// `{config_dir}/lumen/config.toml` for the current platform.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("lumen").join("config.toml"))
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))
}

/// Write the commented starter config to `path`.
///
/// An existing file is only replaced when `overwrite` is set; otherwise
/// [`ConfigError::AlreadyExists`] is returned and the file is left alone.
pub fn create_default_config(path: &Path, overwrite: bool) -> Result<(), ConfigError> {
    if !overwrite && path.exists() {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }

    let write_error = |e: std::io::Error| {
        ConfigError::ParseError(format!("failed to write {}: {e}", path.display()))
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, default_config_toml()).map_err(write_error)?;

    info!(path = %path.display(), overwrite, "wrote starter config");
    Ok(())
}
