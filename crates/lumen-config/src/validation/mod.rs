//! Full configuration validation.
//!
//! Each section has its own validator; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod helpers;
mod pages;
mod remote;
mod themes;

#[cfg(test)]
mod tests;

use crate::schema::LumenConfig;
use lumen_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &LumenConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    remote::validate_remote(&mut errors, config);
    themes::validate_themes(&mut errors, config);
    pages::validate_pages(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
