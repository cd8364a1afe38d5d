//! Configuration schema types for Lumen.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the compiled-in defaults.

mod pages;
mod remote;
mod system;
mod themes;

pub use pages::*;
pub use remote::*;
pub use system::*;
pub use themes::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Lumen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LumenConfig {
    pub remote: RemoteConfig,
    pub themes: ThemesConfig,
    pub pages: PagesConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: LumenConfig = toml::from_str(
            r#"
[remote]
branch = "dev"
"#,
        )
        .unwrap();
        assert_eq!(config.remote.branch, "dev");
        assert_eq!(config.remote.owner, RemoteConfig::default().owner);
        assert_eq!(config.themes.retain_recent, 2);
        assert_eq!(config.pages.rules.len(), PagesConfig::default().rules.len());
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = LumenConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: LumenConfig = toml::from_str(&text).unwrap();
        assert_eq!(
            parsed.themes.required_categories,
            config.themes.required_categories
        );
        assert_eq!(parsed.remote.raw_base, config.remote.raw_base);
    }
}
