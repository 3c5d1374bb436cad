//! Wire protocol between this process and the browser host.
//!
//! One JSON object per line in each direction. The host pushes events and
//! navigation requests and answers our calls; we answer navigations and
//! management requests and issue calls.

use serde::{Deserialize, Serialize};
use taskbar_common::{HostEvent, SiteId, TabId, WindowId};
use taskbar_routing::{ManagementRequest, ManagementResponse, NavigationRequest, ShortcutSpec, Verdict, WindowTarget};

/// Messages received from the host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inbound {
    Event {
        event: HostEvent,
    },
    /// A top-level navigation waiting for a verdict.
    Navigate {
        id: u64,
        request: NavigationRequest,
    },
    Manage {
        id: u64,
        request: ManagementRequest,
    },
    /// Answer to one of our calls. `error` wins over `result`.
    Reply {
        id: u64,
        #[serde(default)]
        result: Option<serde_json::Value>,
        #[serde(default)]
        error: Option<String>,
    },
}

/// Messages sent to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    Verdict { id: u64, verdict: Verdict },
    Managed { id: u64, response: ManagementResponse },
    Call { id: u64, call: HostCall },
}

/// A host or window chrome operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum HostCall {
    ListWindows,
    CreateWindow { target: WindowTarget },
    MoveTab { tab: TabId, window: WindowId },
    CreateTab { window: WindowId, url: String },
    NavigateTab { tab: TabId, url: String },
    ActivateTab { tab: TabId },
    CloseTab { tab: TabId },
    GetTab { tab: TabId },
    QueryActiveTab { window: WindowId },
    QueryTabs { window: WindowId },
    FocusWindow { window: WindowId },
    SetGroupId { window: WindowId, token: String },
    SetWindowIcon { window: WindowId, icon: String },
    CreateShortcut { spec: ShortcutSpec },
    DeleteShortcut {
        site: SiteId,
        display_name: String,
        delete_icon: bool,
    },
    IsPinned { token: String },
}

impl HostCall {
    pub fn method(&self) -> &'static str {
        match self {
            HostCall::ListWindows => "list_windows",
            HostCall::CreateWindow { .. } => "create_window",
            HostCall::MoveTab { .. } => "move_tab",
            HostCall::CreateTab { .. } => "create_tab",
            HostCall::NavigateTab { .. } => "navigate_tab",
            HostCall::ActivateTab { .. } => "activate_tab",
            HostCall::CloseTab { .. } => "close_tab",
            HostCall::GetTab { .. } => "get_tab",
            HostCall::QueryActiveTab { .. } => "query_active_tab",
            HostCall::QueryTabs { .. } => "query_tabs",
            HostCall::FocusWindow { .. } => "focus_window",
            HostCall::SetGroupId { .. } => "set_group_id",
            HostCall::SetWindowIcon { .. } => "set_window_icon",
            HostCall::CreateShortcut { .. } => "create_shortcut",
            HostCall::DeleteShortcut { .. } => "delete_shortcut",
            HostCall::IsPinned { .. } => "is_pinned",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_messages() {
        let navigate: Inbound = serde_json::from_str(
            r#"{"type":"navigate","id":4,"request":{"tab":2,"url":"https://a.com/"}}"#,
        )
        .unwrap();
        assert_eq!(
            navigate,
            Inbound::Navigate {
                id: 4,
                request: NavigationRequest::new(TabId(2), "https://a.com/"),
            }
        );

        let event: Inbound = serde_json::from_str(
            r#"{"type":"event","event":{"type":"window_focused","window":3}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            Inbound::Event {
                event: HostEvent::WindowFocused { window: WindowId(3) },
            }
        );

        let reply: Inbound = serde_json::from_str(r#"{"type":"reply","id":9}"#).unwrap();
        assert_eq!(
            reply,
            Inbound::Reply {
                id: 9,
                result: None,
                error: None,
            }
        );
    }

    #[test]
    fn calls_are_tagged_by_method() {
        let message = Outbound::Call {
            id: 1,
            call: HostCall::MoveTab {
                tab: TabId(5),
                window: WindowId(2),
            },
        };
        assert_eq!(
            serde_json::to_string(&message).unwrap(),
            r#"{"type":"call","id":1,"call":{"method":"move_tab","tab":5,"window":2}}"#
        );

        let verdict = Outbound::Verdict {
            id: 3,
            verdict: Verdict::Cancel,
        };
        assert_eq!(
            serde_json::to_string(&verdict).unwrap(),
            r#"{"type":"verdict","id":3,"verdict":"cancel"}"#
        );
    }
}
