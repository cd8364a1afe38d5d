//! Theme category and storage-bound validation.

use std::collections::HashSet;

use crate::schema::LumenConfig;

use super::helpers::validate_range;

pub(crate) fn validate_themes(errors: &mut Vec<String>, config: &LumenConfig) {
    let themes = &config.themes;

    if themes.required_categories.is_empty() {
        errors.push("themes.required_categories must list at least one category".into());
    }

    let mut seen = HashSet::new();
    for category in &themes.required_categories {
        // Categories are storage-key suffixes; keep them unambiguous.
        let well_formed = !category.is_empty()
            && category
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !well_formed {
            errors.push(format!(
                "themes.required_categories: '{category}' must be lowercase letters, digits or '_'"
            ));
        }
        if !seen.insert(category.as_str()) {
            errors.push(format!(
                "themes.required_categories: '{category}' is listed twice"
            ));
        }
    }

    validate_range(errors, "themes.min_css_len", themes.min_css_len, 1, 65536);
    validate_range(errors, "themes.retain_recent", themes.retain_recent, 0, 16);
    validate_range(
        errors,
        "themes.eviction_delay_ms",
        themes.eviction_delay_ms,
        0,
        600_000,
    );
}
