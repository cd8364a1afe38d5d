//! Remote theme repository configuration.

use serde::{Deserialize, Serialize};

/// Where themes are discovered and downloaded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Repository-contents API root.
    pub api_base: String,
    /// Raw file host root.
    pub raw_base: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Directory inside the repository holding one sub-directory per theme.
    pub themes_dir: String,
    pub user_agent: String,
    /// Request timeout in seconds (valid range: 1-300).
    pub timeout_secs: u32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".into(),
            raw_base: "https://raw.githubusercontent.com".into(),
            owner: "lumen-themes".into(),
            repo: "portal-themes".into(),
            branch: "main".into(),
            themes_dir: "themes".into(),
            user_agent: "lumen-theme-manager".into(),
            timeout_secs: 30,
        }
    }
}

impl RemoteConfig {
    /// URL of the contents listing for the themes directory.
    pub fn listing_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            self.api_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.themes_dir.trim_matches('/'),
            self.branch
        )
    }

    /// Raw URL of `file_name` inside `remote_path`.
    pub fn asset_url(&self, remote_path: &str, file_name: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}/{}",
            self.raw_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.branch,
            remote_path.trim_matches('/'),
            file_name
        )
    }

    /// Repository path of the directory for `theme_id`.
    pub fn theme_path(&self, theme_id: &str) -> String {
        format!("{}/{theme_id}", self.themes_dir.trim_matches('/'))
    }
}
