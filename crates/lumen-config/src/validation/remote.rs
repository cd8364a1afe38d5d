//! Remote repository validation.

use crate::schema::LumenConfig;

use super::helpers::{validate_non_empty, validate_range};

pub(crate) fn validate_remote(errors: &mut Vec<String>, config: &LumenConfig) {
    let remote = &config.remote;

    for (name, url) in [
        ("remote.api_base", &remote.api_base),
        ("remote.raw_base", &remote.raw_base),
    ] {
        if !url.starts_with("https://") && !url.starts_with("http://") {
            errors.push(format!("{name} must be an http(s) URL, got '{url}'"));
        }
    }

    validate_non_empty(errors, "remote.owner", &remote.owner);
    validate_non_empty(errors, "remote.repo", &remote.repo);
    validate_non_empty(errors, "remote.branch", &remote.branch);
    validate_non_empty(errors, "remote.user_agent", &remote.user_agent);
    validate_range(errors, "remote.timeout_secs", remote.timeout_secs, 1, 300);
}
