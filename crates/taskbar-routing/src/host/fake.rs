//! Scripted in-memory host used by engine tests. It records every call
//! and keeps just enough window/tab state to answer queries; it never
//! emits events on its own.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use taskbar_common::{HostError, SiteId, TabId, TabSnapshot, WindowId, WindowSnapshot};

use super::{BrowserHost, Result, ShortcutSpec, WindowChrome, WindowTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    CreateWindow(WindowTarget),
    MoveTab(TabId, WindowId),
    CreateTab(WindowId, String),
    NavigateTab(TabId, String),
    ActivateTab(TabId),
    CloseTab(TabId),
    FocusWindow(WindowId),
    SetGroupId(WindowId, String),
    SetWindowIcon(WindowId, String),
    CreateShortcut(SiteId, String),
    DeleteShortcut(SiteId, String),
}

#[derive(Default)]
struct FakeState {
    windows: BTreeMap<WindowId, ()>,
    tabs: BTreeMap<TabId, TabSnapshot>,
    next_id: u64,
    calls: Vec<Call>,
    failing: bool,
    pinned: HashSet<String>,
}

pub(crate) struct FakeHost {
    state: Mutex<FakeState>,
}

impl FakeHost {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                next_id: 100,
                ..FakeState::default()
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub(crate) fn add_window(&self, window: WindowId) {
        self.lock().windows.insert(window, ());
    }

    pub(crate) fn add_tab(&self, tab: TabId, window: WindowId, url: &str) {
        let mut state = self.lock();
        state.windows.insert(window, ());
        let active = !state.tabs.values().any(|t| t.window == window);
        state.tabs.insert(
            tab,
            TabSnapshot {
                id: tab,
                window,
                url: Some(url.to_string()),
                icon: None,
                active,
                opener: None,
            },
        );
    }

    pub(crate) fn set_tab_icon(&self, tab: TabId, icon: &str) {
        if let Some(t) = self.lock().tabs.get_mut(&tab) {
            t.icon = Some(icon.to_string());
        }
    }

    pub(crate) fn pin(&self, token: &str) {
        self.lock().pinned.insert(token.to_string());
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn record(&self, call: Call) -> Result<()> {
        let mut state = self.lock();
        if state.failing {
            return Err(HostError::CallFailed(format!("{call:?}")));
        }
        state.calls.push(call);
        Ok(())
    }

    fn next_id(&self) -> u64 {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        id
    }
}

#[async_trait]
impl BrowserHost for FakeHost {
    async fn list_windows(&self) -> Result<Vec<WindowSnapshot>> {
        let state = self.lock();
        Ok(state
            .windows
            .keys()
            .map(|id| WindowSnapshot {
                id: *id,
                tabs: state
                    .tabs
                    .values()
                    .filter(|t| t.window == *id)
                    .cloned()
                    .collect(),
            })
            .collect())
    }

    async fn create_window(&self, target: WindowTarget) -> Result<WindowId> {
        self.record(Call::CreateWindow(target.clone()))?;
        let window = WindowId(self.next_id());
        self.add_window(window);
        match target {
            WindowTarget::Tab(tab) => {
                if let Some(t) = self.lock().tabs.get_mut(&tab) {
                    t.window = window;
                    t.active = true;
                }
            }
            WindowTarget::Url(url) => {
                let tab = TabId(self.next_id());
                self.add_tab(tab, window, &url);
            }
        }
        Ok(window)
    }

    async fn move_tab(&self, tab: TabId, window: WindowId) -> Result<()> {
        self.record(Call::MoveTab(tab, window))?;
        match self.lock().tabs.get_mut(&tab) {
            Some(t) => {
                t.window = window;
                Ok(())
            }
            None => Err(HostError::TabNotFound(tab)),
        }
    }

    async fn create_tab(&self, window: WindowId, url: &str) -> Result<TabId> {
        self.record(Call::CreateTab(window, url.to_string()))?;
        let tab = TabId(self.next_id());
        self.add_tab(tab, window, url);
        Ok(tab)
    }

    async fn navigate_tab(&self, tab: TabId, url: &str) -> Result<()> {
        self.record(Call::NavigateTab(tab, url.to_string()))?;
        if let Some(t) = self.lock().tabs.get_mut(&tab) {
            t.url = Some(url.to_string());
        }
        Ok(())
    }

    async fn activate_tab(&self, tab: TabId) -> Result<()> {
        self.record(Call::ActivateTab(tab))
    }

    async fn close_tab(&self, tab: TabId) -> Result<()> {
        self.record(Call::CloseTab(tab))?;
        self.lock().tabs.remove(&tab);
        Ok(())
    }

    async fn get_tab(&self, tab: TabId) -> Result<TabSnapshot> {
        self.lock()
            .tabs
            .get(&tab)
            .cloned()
            .ok_or(HostError::TabNotFound(tab))
    }

    async fn query_active_tab(&self, window: WindowId) -> Result<TabSnapshot> {
        let state = self.lock();
        let mut in_window = state.tabs.values().filter(|t| t.window == window);
        let first = in_window.clone().next().cloned();
        in_window
            .find(|t| t.active)
            .cloned()
            .or(first)
            .ok_or(HostError::WindowNotFound(window))
    }

    async fn query_tabs(&self, window: WindowId) -> Result<Vec<TabSnapshot>> {
        Ok(self
            .lock()
            .tabs
            .values()
            .filter(|t| t.window == window)
            .cloned()
            .collect())
    }

    async fn focus_window(&self, window: WindowId) -> Result<()> {
        self.record(Call::FocusWindow(window))
    }
}

#[async_trait]
impl WindowChrome for FakeHost {
    async fn set_group_id(&self, window: WindowId, token: &str) -> Result<()> {
        self.record(Call::SetGroupId(window, token.to_string()))
    }

    async fn set_window_icon(&self, window: WindowId, icon: &str) -> Result<()> {
        self.record(Call::SetWindowIcon(window, icon.to_string()))
    }

    async fn create_shortcut(&self, spec: &ShortcutSpec) -> Result<()> {
        self.record(Call::CreateShortcut(spec.site.clone(), spec.display_name.clone()))?;
        if spec.pin {
            self.pin(&spec.group_token);
        }
        Ok(())
    }

    async fn delete_shortcut(
        &self,
        site: &SiteId,
        display_name: &str,
        _delete_icon: bool,
    ) -> Result<()> {
        self.record(Call::DeleteShortcut(site.clone(), display_name.to_string()))
    }

    async fn is_pinned(&self, token: &str) -> Result<bool> {
        Ok(self.lock().pinned.contains(token))
    }
}
