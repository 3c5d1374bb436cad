use serde::{Deserialize, Serialize};
use taskbar_common::LinkBehavior;

/// Process-wide settings.
///
/// Seeded from the `[defaults]` config section and then persisted by the
/// store; the management UI edits the persisted copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Link behavior given to newly installed sites.
    pub link_behavior: LinkBehavior,
    /// Whether newly installed sites open when the host starts.
    pub launch_with_host: bool,
    /// Pin the launcher shortcut of newly installed sites.
    pub pin_site: bool,
    /// Whether new tabs in a site window open the site's homepage.
    pub new_tab_homepage: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            link_behavior: LinkBehavior::NoCapture,
            launch_with_host: false,
            pin_site: true,
            new_tab_homepage: true,
        }
    }
}
