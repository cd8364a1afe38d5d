//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Lumen Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[remote]
# api_base = "https://api.github.com"
# raw_base = "https://raw.githubusercontent.com"
# owner = "lumen-themes"
# repo = "portal-themes"
# branch = "main"
# themes_dir = "themes"
# user_agent = "lumen-theme-manager"
# timeout_secs = 30        # 1-300

[themes]
# required_categories = ["home", "assignments", "extras"]
# min_css_len = 10         # characters, 1-65536
# retain_recent = 2        # 0-16
# eviction_delay_ms = 5000 # 0-600000

[pages]
# packaged_dir = "resources"
# First matching rule wins.
# [[pages.rules]]
# pattern = "student_dashboard|/dashboard"
# category = "home"

[storage]
# path = "/path/to/store.json"
# watch = true

[logging]
# level = "info"           # trace, debug, info, warn, error
"##
    .to_string()
}
