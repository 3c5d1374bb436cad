//! Shared types used across taskbar crates.

use serde::{Deserialize, Serialize};

use crate::id::{SiteId, TabId, WindowId};

/// Where out-of-scope or newly opened navigations for a site land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum LinkBehavior {
    /// The site never captures navigations from other windows.
    #[default]
    NoCapture,
    /// Captured navigations open as a new tab in the site window.
    NewTab,
    /// Captured navigations replace the site window's active tab.
    CurrentTab,
    /// Every captured navigation gets its own site window.
    NewWindow,
}

impl LinkBehavior {
    pub fn captures(self) -> bool {
        self != LinkBehavior::NoCapture
    }
}

/// In-flight routing intent for a tab that is being relocated.
///
/// Set immediately before a move is initiated and cleared once the destination
/// window has accepted the tab.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "site", rename_all = "snake_case")]
pub enum DetachIntent {
    #[default]
    NotMoving,
    MovingToSiteless,
    MovingToSite(SiteId),
}

impl DetachIntent {
    /// Intent for a move whose destination is bound to `site` (or siteless).
    pub fn toward(site: Option<SiteId>) -> Self {
        match site {
            Some(id) => DetachIntent::MovingToSite(id),
            None => DetachIntent::MovingToSiteless,
        }
    }

    pub fn is_moving(&self) -> bool {
        !matches!(self, DetachIntent::NotMoving)
    }

    /// Destination site of the move, if any. `None` also for `NotMoving`.
    pub fn site(&self) -> Option<&SiteId> {
        match self {
            DetachIntent::MovingToSite(id) => Some(id),
            _ => None,
        }
    }
}

/// Tab state as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSnapshot {
    pub id: TabId,
    pub window: WindowId,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub opener: Option<TabId>,
}

/// Window state as reported by the host at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSnapshot {
    pub id: WindowId,
    #[serde(default)]
    pub tabs: Vec<TabSnapshot>,
}
