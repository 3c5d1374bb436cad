//! Host and window chrome calls forwarded over the bridge.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use taskbar_common::{HostError, SiteId, TabId, TabSnapshot, WindowId, WindowSnapshot};
use taskbar_routing::{BrowserHost, ShortcutSpec, WindowChrome, WindowTarget};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use super::protocol::{HostCall, Outbound};

type Result<T> = std::result::Result<T, HostError>;

/// What the host answered: a JSON result or an error message.
pub type Reply = std::result::Result<serde_json::Value, String>;

/// How long a call may wait for its reply.
pub const CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Implements both collaborator contracts by writing calls to the host and
/// matching replies back by id.
pub struct BridgeHost {
    outbound: mpsc::UnboundedSender<Outbound>,
    pending: Mutex<HashMap<u64, oneshot::Sender<Reply>>>,
    next_id: AtomicU64,
    timeout: Duration,
}

impl BridgeHost {
    pub fn new(outbound: mpsc::UnboundedSender<Outbound>, timeout: Duration) -> Self {
        Self {
            outbound,
            pending: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            timeout,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u64, oneshot::Sender<Reply>>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Hand a reply to the call waiting on `id`. Returns `false` if nothing
    /// is waiting (the call timed out or the id is unknown).
    pub fn resolve(&self, id: u64, reply: Reply) -> bool {
        match self.lock().remove(&id) {
            Some(waiter) => waiter.send(reply).is_ok(),
            None => false,
        }
    }

    /// The host went away: fail every call still waiting.
    pub fn disconnect(&self) {
        let dropped = {
            let mut pending = self.lock();
            let count = pending.len();
            pending.clear();
            count
        };
        if dropped > 0 {
            debug!(dropped, "failed pending host calls on disconnect");
        }
    }

    #[cfg(test)]
    fn pending_calls(&self) -> usize {
        self.lock().len()
    }

    async fn call<T: DeserializeOwned>(&self, call: HostCall) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let method = call.method();
        let (tx, rx) = oneshot::channel();
        self.lock().insert(id, tx);

        if self.outbound.send(Outbound::Call { id, call }).is_err() {
            self.lock().remove(&id);
            return Err(HostError::Disconnected);
        }

        let reply = match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => return Err(HostError::Disconnected),
            Err(_) => {
                self.lock().remove(&id);
                return Err(HostError::CallFailed(format!("{method} timed out")));
            }
        };
        let value = reply.map_err(HostError::CallFailed)?;
        serde_json::from_value(value)
            .map_err(|e| HostError::CallFailed(format!("{method} returned an unexpected result: {e}")))
    }
}

#[async_trait]
impl BrowserHost for BridgeHost {
    async fn list_windows(&self) -> Result<Vec<WindowSnapshot>> {
        self.call(HostCall::ListWindows).await
    }

    async fn create_window(&self, target: WindowTarget) -> Result<WindowId> {
        self.call(HostCall::CreateWindow { target }).await
    }

    async fn move_tab(&self, tab: TabId, window: WindowId) -> Result<()> {
        self.call(HostCall::MoveTab { tab, window }).await
    }

    async fn create_tab(&self, window: WindowId, url: &str) -> Result<TabId> {
        self.call(HostCall::CreateTab {
            window,
            url: url.to_string(),
        })
        .await
    }

    async fn navigate_tab(&self, tab: TabId, url: &str) -> Result<()> {
        self.call(HostCall::NavigateTab {
            tab,
            url: url.to_string(),
        })
        .await
    }

    async fn activate_tab(&self, tab: TabId) -> Result<()> {
        self.call(HostCall::ActivateTab { tab }).await
    }

    async fn close_tab(&self, tab: TabId) -> Result<()> {
        self.call(HostCall::CloseTab { tab }).await
    }

    async fn get_tab(&self, tab: TabId) -> Result<TabSnapshot> {
        self.call::<Option<TabSnapshot>>(HostCall::GetTab { tab })
            .await?
            .ok_or(HostError::TabNotFound(tab))
    }

    async fn query_active_tab(&self, window: WindowId) -> Result<TabSnapshot> {
        self.call::<Option<TabSnapshot>>(HostCall::QueryActiveTab { window })
            .await?
            .ok_or(HostError::WindowNotFound(window))
    }

    async fn query_tabs(&self, window: WindowId) -> Result<Vec<TabSnapshot>> {
        self.call(HostCall::QueryTabs { window }).await
    }

    async fn focus_window(&self, window: WindowId) -> Result<()> {
        self.call(HostCall::FocusWindow { window }).await
    }
}

#[async_trait]
impl WindowChrome for BridgeHost {
    async fn set_group_id(&self, window: WindowId, token: &str) -> Result<()> {
        self.call(HostCall::SetGroupId {
            window,
            token: token.to_string(),
        })
        .await
    }

    async fn set_window_icon(&self, window: WindowId, icon: &str) -> Result<()> {
        self.call(HostCall::SetWindowIcon {
            window,
            icon: icon.to_string(),
        })
        .await
    }

    async fn create_shortcut(&self, spec: &ShortcutSpec) -> Result<()> {
        self.call(HostCall::CreateShortcut { spec: spec.clone() })
            .await
    }

    async fn delete_shortcut(
        &self,
        site: &SiteId,
        display_name: &str,
        delete_icon: bool,
    ) -> Result<()> {
        self.call(HostCall::DeleteShortcut {
            site: site.clone(),
            display_name: display_name.to_string(),
            delete_icon,
        })
        .await
    }

    async fn is_pinned(&self, token: &str) -> Result<bool> {
        self.call(HostCall::IsPinned {
            token: token.to_string(),
        })
        .await
    }
}
