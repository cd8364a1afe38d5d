//! Persistent store key layout.
//!
//! - `theme`: active theme id (or `default`)
//! - `themes_config`: serialized catalog
//! - `themes_config_updated`: catalog refresh timestamp
//! - `{theme}-{category}`: CSS text for one category of one theme
//! - `{theme}_downloaded`: download completion timestamp

pub const ACTIVE_THEME_KEY: &str = "theme";
pub const CATALOG_KEY: &str = "themes_config";
pub const CATALOG_UPDATED_KEY: &str = "themes_config_updated";

const DOWNLOAD_MARKER_SUFFIX: &str = "_downloaded";

/// Key holding the CSS for `category` of `theme_id`.
pub fn asset_key(theme_id: &str, category: &str) -> String {
    format!("{theme_id}-{category}")
}

/// Key holding the download timestamp of `theme_id`.
pub fn download_marker_key(theme_id: &str) -> String {
    format!("{theme_id}{DOWNLOAD_MARKER_SUFFIX}")
}

/// All keys a downloaded theme occupies, marker last.
pub fn theme_keys(theme_id: &str, categories: &[String]) -> Vec<String> {
    let mut keys: Vec<String> = categories
        .iter()
        .map(|category| asset_key(theme_id, category))
        .collect();
    keys.push(download_marker_key(theme_id));
    keys
}

pub fn is_reserved_key(key: &str) -> bool {
    matches!(key, ACTIVE_THEME_KEY | CATALOG_KEY | CATALOG_UPDATED_KEY)
}

/// Theme id of a download marker key.
pub fn theme_from_marker_key(key: &str) -> Option<&str> {
    if is_reserved_key(key) {
        return None;
    }
    key.strip_suffix(DOWNLOAD_MARKER_SUFFIX)
        .filter(|id| !id.is_empty())
}

/// Theme id of an asset key, given the known categories.
pub fn theme_from_asset_key<'a>(key: &'a str, categories: &[String]) -> Option<&'a str> {
    if is_reserved_key(key) {
        return None;
    }
    categories.iter().find_map(|category| {
        key.strip_suffix(category.as_str())
            .and_then(|rest| rest.strip_suffix('-'))
            .filter(|id| !id.is_empty())
    })
}
