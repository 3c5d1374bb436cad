//! Window and tab records.

use taskbar_common::{DetachIntent, SiteId, TabId, WindowId};

/// Live state of one host window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowRecord {
    /// Bound site; `None` is a normal (siteless) window.
    pub site: Option<SiteId>,
    /// True until the first navigation in the window decides its type.
    pub unclassified: bool,
    /// Icon currently shown by the window chrome.
    pub icon: Option<String>,
}

impl WindowRecord {
    pub fn unclassified() -> Self {
        Self {
            site: None,
            unclassified: true,
            icon: None,
        }
    }

    pub fn bound(site: Option<SiteId>) -> Self {
        Self {
            site,
            unclassified: false,
            icon: None,
        }
    }

    pub fn is_site_window(&self) -> bool {
        self.site.is_some()
    }
}

/// Live state of one host tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabRecord {
    pub window: WindowId,
    /// Window the tab last left, used when it is sent back.
    pub moved_from: Option<WindowId>,
    /// Where the tab is headed while a move is in flight.
    pub intent: DetachIntent,
    /// Opened on the blank placeholder and not yet navigated.
    pub blank: bool,
    /// Not yet used by the user; safe to close silently.
    pub is_new: bool,
    /// The user pulled this tab out of a site; never capture it again.
    pub no_capture: bool,
    pub active: bool,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub opener: Option<TabId>,
}

impl TabRecord {
    pub fn new(window: WindowId) -> Self {
        Self {
            window,
            moved_from: None,
            intent: DetachIntent::NotMoving,
            blank: false,
            is_new: true,
            no_capture: false,
            active: false,
            url: None,
            icon: None,
            opener: None,
        }
    }
}
