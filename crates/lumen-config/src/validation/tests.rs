//! Tests for the full validation pipeline.

use super::*;
use crate::schema::*;

#[test]
fn default_config_validates() {
    let config = LumenConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_non_http_base() {
    let mut config = LumenConfig::default();
    config.remote.raw_base = "ftp://example.com".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("remote.raw_base"));
}

#[test]
fn catches_empty_branch() {
    let mut config = LumenConfig::default();
    config.remote.branch = "  ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("remote.branch"));
}

#[test]
fn catches_timeout_out_of_range() {
    let mut config = LumenConfig::default();
    config.remote.timeout_secs = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("remote.timeout_secs"));
}

#[test]
fn catches_empty_category_list() {
    let mut config = LumenConfig::default();
    config.themes.required_categories.clear();
    config.pages.rules.clear();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("at least one category"));
}

#[test]
fn catches_hyphenated_and_duplicate_categories() {
    let mut config = LumenConfig::default();
    config.themes.required_categories = vec!["home".into(), "side-bar".into(), "home".into()];
    config.pages.rules.clear();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("'side-bar'"));
    assert!(err.contains("listed twice"));
}

#[test]
fn catches_retain_recent_too_large() {
    let mut config = LumenConfig::default();
    config.themes.retain_recent = 100;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("themes.retain_recent"));
}

#[test]
fn catches_bad_rule_regex_and_unknown_category() {
    let mut config = LumenConfig::default();
    config.pages.rules = vec![
        PageRule::new("(unclosed", "home"),
        PageRule::new("grades", "grades"),
    ];
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("pages.rules[0].pattern"));
    assert!(err.contains("pages.rules[1].category 'grades'"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = LumenConfig::default();
    config.themes.min_css_len = 0;
    config.remote.owner = String::new();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("themes.min_css_len"));
    assert!(err.contains("remote.owner"));
}
