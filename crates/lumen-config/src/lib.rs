//! Lumen configuration system.
//!
//! Every setting has a compiled-in default (repository location, branch,
//! required page categories, storage bounds), so Lumen runs without any
//! config file. An optional TOML file overrides individual fields.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lumen_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("{:?}", config.themes.required_categories);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    LogLevel, LoggingConfig, LumenConfig, PageRule, PagesConfig, RemoteConfig, StorageConfig,
    ThemesConfig, CONFIG_SCHEMA_VERSION,
};

use lumen_common::ConfigError;

/// Load config from the platform default path and validate it.
///
/// A missing file is not an error: the compiled-in defaults are used.
pub fn load_config() -> Result<LumenConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path and validate it.
pub fn load_config_from(path: &std::path::Path) -> Result<LumenConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}
