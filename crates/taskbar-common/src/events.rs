//! Lifecycle events emitted by the browser host.

use serde::{Deserialize, Serialize};

use crate::id::{TabId, WindowId};
use crate::types::TabSnapshot;

/// Properties of a tab that changed in a single update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabChange {
    pub url: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    WindowOpened {
        window: WindowId,
    },
    WindowClosed {
        window: WindowId,
    },
    WindowFocused {
        window: WindowId,
    },
    TabOpened {
        tab: TabSnapshot,
    },
    TabClosed {
        tab: TabId,
    },
    TabDetached {
        tab: TabId,
        old_window: WindowId,
    },
    TabAttached {
        tab: TabId,
        new_window: WindowId,
    },
    TabActivated {
        tab: TabId,
        window: WindowId,
    },
    TabUpdated {
        tab: TabId,
        window: WindowId,
        change: TabChange,
    },
    /// The user typed or clicked inside the tab's page.
    TabInteraction {
        tab: TabId,
    },
}

impl HostEvent {
    /// Short name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            HostEvent::WindowOpened { .. } => "window_opened",
            HostEvent::WindowClosed { .. } => "window_closed",
            HostEvent::WindowFocused { .. } => "window_focused",
            HostEvent::TabOpened { .. } => "tab_opened",
            HostEvent::TabClosed { .. } => "tab_closed",
            HostEvent::TabDetached { .. } => "tab_detached",
            HostEvent::TabAttached { .. } => "tab_attached",
            HostEvent::TabActivated { .. } => "tab_activated",
            HostEvent::TabUpdated { .. } => "tab_updated",
            HostEvent::TabInteraction { .. } => "tab_interaction",
        }
    }
}
