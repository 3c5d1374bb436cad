use serde::{Deserialize, Serialize};

/// Window chrome integration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeConfig {
    /// Prefix of the group token that separates a site window on the taskbar.
    pub group_prefix: String,
    /// Icon used when a window has none to offer.
    pub default_icon: String,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            group_prefix: "taskbar-".into(),
            default_icon: String::new(),
        }
    }
}
