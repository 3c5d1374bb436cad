//! Collaborator contracts: the browser host that owns windows and tabs, and
//! the window chrome integration that owns taskbar grouping and shortcuts.

pub mod noop;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use taskbar_common::{HostError, SiteId, TabId, TabSnapshot, WindowId, WindowSnapshot};

pub type Result<T> = std::result::Result<T, HostError>;

/// What a new window starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum WindowTarget {
    Url(String),
    Tab(TabId),
}

/// Launcher shortcut for an installed site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutSpec {
    pub site: SiteId,
    pub display_name: String,
    /// Arguments the launcher passes to the host.
    pub args: Vec<String>,
    pub icon: Option<String>,
    pub group_token: String,
    /// Pin the shortcut to the taskbar after creating it.
    pub pin: bool,
}

impl ShortcutSpec {
    pub fn args_for_homepage(homepage: &str) -> Vec<String> {
        vec!["-new-window".to_string(), homepage.to_string()]
    }
}

/// Window and tab operations offered by the host. Every call may fail
/// because the window or tab has gone away in the meantime.
#[async_trait]
pub trait BrowserHost: Send + Sync {
    async fn list_windows(&self) -> Result<Vec<WindowSnapshot>>;
    async fn create_window(&self, target: WindowTarget) -> Result<WindowId>;
    async fn move_tab(&self, tab: TabId, window: WindowId) -> Result<()>;
    async fn create_tab(&self, window: WindowId, url: &str) -> Result<TabId>;
    async fn navigate_tab(&self, tab: TabId, url: &str) -> Result<()>;
    async fn activate_tab(&self, tab: TabId) -> Result<()>;
    async fn close_tab(&self, tab: TabId) -> Result<()>;
    async fn get_tab(&self, tab: TabId) -> Result<TabSnapshot>;
    async fn query_active_tab(&self, window: WindowId) -> Result<TabSnapshot>;
    async fn query_tabs(&self, window: WindowId) -> Result<Vec<TabSnapshot>>;
    async fn focus_window(&self, window: WindowId) -> Result<()>;
}

/// OS-level window grouping, icons, and launcher shortcuts.
#[async_trait]
pub trait WindowChrome: Send + Sync {
    async fn set_group_id(&self, window: WindowId, token: &str) -> Result<()>;
    async fn set_window_icon(&self, window: WindowId, icon: &str) -> Result<()>;
    async fn create_shortcut(&self, spec: &ShortcutSpec) -> Result<()>;
    async fn delete_shortcut(
        &self,
        site: &SiteId,
        display_name: &str,
        delete_icon: bool,
    ) -> Result<()>;
    async fn is_pinned(&self, token: &str) -> Result<bool>;
}
