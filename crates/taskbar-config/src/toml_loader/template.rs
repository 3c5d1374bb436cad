//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Taskbar Tabs Configuration
# Only override what you want to change -- missing fields use defaults.

[defaults]
# link_behavior = "no_capture"   # no_capture, new_tab, current_tab, new_window
# launch_with_host = false
# pin_site = true
# new_tab_homepage = true

[routing]
# retry_delay_ms = 100           # 10-5000
# max_retries = 10               # 1-100
# settle_timeout_ms = 5000       # 100-60000
# icon_timeout_ms = 5000         # 0-60000
# site_close_grace_ms = 500      # 0-10000
# same_domain_allowance = true
# wildcard_includes_apex = true
# new_tab_pages = ["about:newtab", "about:home", "about:blank", "about:privatebrowsing", "chrome://newtab/"]

[chrome]
# group_prefix = "taskbar-"
# default_icon = ""

[storage]
# path = "/path/to/state.json"

[logging]
# level = "info"                 # debug, info, warn, error
"##
    .to_string()
}
