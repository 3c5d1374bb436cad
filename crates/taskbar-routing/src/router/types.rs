//! Navigation requests and the decisions the router makes about them.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use taskbar_common::{SiteId, TabId, WindowId};

/// A top-level navigation offered before commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRequest {
    /// Requesting tab; `None` for background or devtools requests.
    #[serde(default)]
    pub tab: Option<TabId>,
    pub url: String,
}

impl NavigationRequest {
    pub fn new(tab: TabId, url: impl Into<String>) -> Self {
        Self {
            tab: Some(tab),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Allow,
    Cancel,
}

/// Side effect the engine performs after answering a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Navigate `tab` to `url` again once `after` has elapsed.
    Reissue {
        tab: TabId,
        url: String,
        after: Duration,
    },
    /// Apply site window chrome to a window that was just classified.
    EnsureSiteWindow { window: WindowId, site: SiteId },
    /// Open a window on `url` and let its first navigation classify it.
    OpenWindow { url: String },
    /// Open a window on `url`, bound to `site` (siteless for `None`), on
    /// behalf of `source`, whose move intent is cleared once it exists.
    OpenWindowFor {
        url: String,
        site: Option<SiteId>,
        source: TabId,
    },
    /// Pop `tab` out into a new window of its own.
    MoveTabToNewWindow { tab: TabId },
    MoveTab { tab: TabId, window: WindowId },
    /// Focus `window` and load `url` in its active tab.
    NavigateActiveTab { window: WindowId, url: String },
    /// Focus `window` and load `url` in a new tab there.
    OpenTab { window: WindowId, url: String },
    /// Close `tab` if it was never really used.
    DisposeTab { tab: TabId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOutcome {
    pub verdict: Verdict,
    pub effects: Vec<Effect>,
}

impl RouteOutcome {
    pub fn allow() -> Self {
        Self {
            verdict: Verdict::Allow,
            effects: Vec::new(),
        }
    }

    pub fn allow_with(effects: Vec<Effect>) -> Self {
        Self {
            verdict: Verdict::Allow,
            effects,
        }
    }

    pub fn cancel_with(effects: Vec<Effect>) -> Self {
        Self {
            verdict: Verdict::Cancel,
            effects,
        }
    }
}
