//! Tab records and in-flight move intents.

use taskbar_common::{DetachIntent, SiteId, TabId, TabSnapshot, WindowId};

use super::{TabRecord, Tracker};

impl Tracker {
    // -- Accessors --

    pub fn tab(&self, id: TabId) -> Option<&TabRecord> {
        self.tabs.get(&id)
    }

    pub fn tab_mut(&mut self, id: TabId) -> Option<&mut TabRecord> {
        self.tabs.get_mut(&id)
    }

    pub fn tabs_in_window(&self, window: WindowId) -> Vec<TabId> {
        let mut ids: Vec<TabId> = self
            .tabs
            .iter()
            .filter(|(_, tab)| tab.window == window)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    pub fn active_tab(&self, window: WindowId) -> Option<TabId> {
        self.tabs
            .iter()
            .find(|(_, tab)| tab.window == window && tab.active)
            .map(|(id, _)| *id)
    }

    /// Number of tabs with a move in flight.
    pub fn pending_moves(&self) -> usize {
        self.tabs.values().filter(|tab| tab.intent.is_moving()).count()
    }

    // -- Lifecycle --

    /// Record a tab the user just opened.
    pub fn tab_opened(&mut self, snapshot: &TabSnapshot) -> &TabRecord {
        let mut record = TabRecord::new(snapshot.window);
        record.url = snapshot.url.clone();
        record.icon = snapshot.icon.clone();
        record.opener = snapshot.opener;
        if snapshot.active {
            self.clear_active(snapshot.window);
            record.active = true;
        }
        self.tabs.entry(snapshot.id).or_insert(record)
    }

    /// Record a tab that already existed at startup. It is not new.
    pub fn adopt_tab(&mut self, snapshot: &TabSnapshot) {
        let mut record = TabRecord::new(snapshot.window);
        record.is_new = false;
        record.url = snapshot.url.clone();
        record.icon = snapshot.icon.clone();
        record.active = snapshot.active;
        self.tabs.insert(snapshot.id, record);
    }

    pub fn tab_closed(&mut self, id: TabId) -> Option<TabRecord> {
        self.tabs.remove(&id)
    }

    /// Host detached the tab from `old_window`. Unless a move is already
    /// under way, the intent becomes "back to a window like the one it left".
    pub fn tab_detached(&mut self, id: TabId, old_window: WindowId) -> Option<&DetachIntent> {
        let old_site = self.windows.get(&old_window).map(|w| w.site.clone());
        let tab = self.tabs.get_mut(&id)?;
        if !tab.intent.is_moving() {
            tab.intent = DetachIntent::toward(old_site.flatten());
        }
        Some(&tab.intent)
    }

    /// Host attached the tab to `window`.
    pub fn tab_attached(&mut self, id: TabId, window: WindowId) -> bool {
        match self.tabs.get_mut(&id) {
            Some(tab) => {
                tab.window = window;
                true
            }
            None => false,
        }
    }

    // -- Moves --

    /// Mark the start of a move toward a window bound to `dest`.
    pub fn begin_move(&mut self, id: TabId, dest: Option<SiteId>) -> bool {
        match self.tabs.get_mut(&id) {
            Some(tab) => {
                tab.moved_from = Some(tab.window);
                tab.intent = DetachIntent::toward(dest);
                true
            }
            None => false,
        }
    }

    pub fn clear_intent(&mut self, id: TabId) {
        if let Some(tab) = self.tabs.get_mut(&id) {
            tab.intent = DetachIntent::NotMoving;
        }
    }

    /// Drop every in-flight intent. Returns how many were dropped.
    pub fn reset_intents(&mut self) -> usize {
        let mut reset = 0;
        for tab in self.tabs.values_mut() {
            if tab.intent.is_moving() {
                tab.intent = DetachIntent::NotMoving;
                reset += 1;
            }
        }
        reset
    }

    // -- Flags --

    /// The user interacted with the tab; it is no longer disposable.
    pub fn mark_interacted(&mut self, id: TabId) -> bool {
        match self.tabs.get_mut(&id) {
            Some(tab) => {
                tab.is_new = false;
                true
            }
            None => false,
        }
    }

    pub fn set_active(&mut self, id: TabId, window: WindowId) {
        self.clear_active(window);
        if let Some(tab) = self.tabs.get_mut(&id) {
            tab.window = window;
            tab.active = true;
        }
    }

    fn clear_active(&mut self, window: WindowId) {
        for tab in self.tabs.values_mut().filter(|t| t.window == window) {
            tab.active = false;
        }
    }
}
