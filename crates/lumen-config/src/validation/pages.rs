//! Page rule validation.

use crate::schema::LumenConfig;

pub(crate) fn validate_pages(errors: &mut Vec<String>, config: &LumenConfig) {
    for (i, rule) in config.pages.rules.iter().enumerate() {
        if let Err(e) = regex::Regex::new(&rule.pattern) {
            errors.push(format!("pages.rules[{i}].pattern is not a valid regex: {e}"));
        }
        if !config
            .themes
            .required_categories
            .iter()
            .any(|c| c == &rule.category)
        {
            errors.push(format!(
                "pages.rules[{i}].category '{}' is not a required category",
                rule.category
            ));
        }
    }
}
