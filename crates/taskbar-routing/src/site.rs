//! Installed site records.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use taskbar_common::{LinkBehavior, SiteError, SiteId};
use taskbar_config::Settings;
use url::Url;

use crate::scope::Scope;

static RESERVED_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\?%*:|"<>]"#).unwrap());

/// An installed web application binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub scope: Scope,
    pub display_name: String,
    pub homepage: String,
    pub link_behavior: LinkBehavior,
    pub launch_with_host: bool,
    pub new_tab_homepage: bool,
    /// Cached from the window chrome; refreshed at startup.
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Site {
    /// A new site for `scope` using the process-wide defaults.
    pub fn new(scope: Scope, settings: &Settings) -> Self {
        Self {
            id: scope.site_id(),
            display_name: scope.display_name(),
            homepage: scope.homepage(),
            scope,
            link_behavior: settings.link_behavior,
            launch_with_host: settings.launch_with_host,
            new_tab_homepage: settings.new_tab_homepage,
            pinned: settings.pin_site,
            icon: None,
        }
    }

    pub fn homepage_url(&self) -> Option<Url> {
        Url::parse(&self.homepage).ok()
    }
}

/// Allow-listed mutable fields of a site. Scope is deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitePatch {
    pub display_name: Option<String>,
    pub homepage: Option<String>,
    pub link_behavior: Option<LinkBehavior>,
    pub launch_with_host: Option<bool>,
    pub new_tab_homepage: Option<bool>,
}

/// Display names become shortcut file names, so path and shell
/// metacharacters are rejected.
pub fn validate_display_name(name: &str) -> Result<(), SiteError> {
    if name.trim().is_empty() || RESERVED_NAME_RE.is_match(name) {
        return Err(SiteError::InvalidDisplayName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_site_uses_defaults() {
        let scope = Scope::parse("*.example.com").unwrap();
        let settings = Settings {
            link_behavior: LinkBehavior::NewTab,
            ..Settings::default()
        };
        let site = Site::new(scope.clone(), &settings);
        assert_eq!(site.id, scope.site_id());
        assert_eq!(site.display_name, "Example");
        assert_eq!(site.homepage, "https://example.com");
        assert_eq!(site.link_behavior, LinkBehavior::NewTab);
        assert!(site.pinned);
        assert!(site.new_tab_homepage);
    }

    #[test]
    fn display_name_validation() {
        assert!(validate_display_name("Mail").is_ok());
        assert!(validate_display_name("My App 2").is_ok());
        for bad in ["", "   ", "a/b", "a\\b", "what?", "50%", "x*y", "c:", "a|b", "\"q\"", "<b>"] {
            assert!(validate_display_name(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn site_json_round_trip_keeps_scope_text() {
        let site = Site::new(Scope::parse("b.com/x").unwrap(), &Settings::default());
        let json = serde_json::to_string(&site).unwrap();
        assert!(json.contains("\"scope\":\"b.com/x\""));
        let back: Site = serde_json::from_str(&json).unwrap();
        assert_eq!(back, site);
    }
}
