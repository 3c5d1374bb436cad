use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Navigation routing and reconciliation tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Delay before a navigation that could not be classified is re-issued.
    pub retry_delay_ms: u64,
    /// Re-issues per navigation before it is allowed through unclassified.
    pub max_retries: u32,
    /// Upper bound on waits for detach metadata and pending moves.
    pub settle_timeout_ms: u64,
    /// Upper bound on waiting for a window icon at install time.
    pub icon_timeout_ms: u64,
    /// How long a move out of a site waits for the site's last window to close.
    pub site_close_grace_ms: u64,
    /// Keep same-registrable-domain navigations inside a site window.
    pub same_domain_allowance: bool,
    /// Let `*.example.com` also match `example.com` itself.
    pub wildcard_includes_apex: bool,
    /// URLs that count as an empty new tab.
    pub new_tab_pages: Vec<String>,
}

impl RoutingConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }

    pub fn icon_timeout(&self) -> Duration {
        Duration::from_millis(self.icon_timeout_ms)
    }

    pub fn site_close_grace(&self) -> Duration {
        Duration::from_millis(self.site_close_grace_ms)
    }

    pub fn is_new_tab_page(&self, url: &str) -> bool {
        self.new_tab_pages.iter().any(|page| page == url)
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            retry_delay_ms: 100,
            max_retries: 10,
            settle_timeout_ms: 5000,
            icon_timeout_ms: 5000,
            site_close_grace_ms: 500,
            same_domain_allowance: true,
            wildcard_includes_apex: true,
            new_tab_pages: vec![
                "about:newtab".into(),
                "about:home".into(),
                "about:blank".into(),
                "about:privatebrowsing".into(),
                "chrome://newtab/".into(),
            ],
        }
    }
}
