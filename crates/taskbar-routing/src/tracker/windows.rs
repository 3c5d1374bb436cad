//! Window records and focus recency.

use taskbar_common::{SiteId, WindowId};

use super::{Tracker, WindowRecord};

impl Tracker {
    // -- Accessors --

    pub fn window(&self, id: WindowId) -> Option<&WindowRecord> {
        self.windows.get(&id)
    }

    pub fn is_tracked(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Window ids, most recently focused first.
    pub fn windows_by_recency(&self) -> impl Iterator<Item = (WindowId, &WindowRecord)> {
        self.recency
            .iter()
            .filter_map(|id| self.windows.get(id).map(|record| (*id, record)))
    }

    pub fn site_has_open_window(&self, site: &SiteId) -> bool {
        self.windows
            .values()
            .any(|record| record.site.as_ref() == Some(site))
    }

    pub fn windows_for_site(&self, site: &SiteId) -> Vec<WindowId> {
        self.windows_by_recency()
            .filter(|(_, record)| record.site.as_ref() == Some(site))
            .map(|(id, _)| id)
            .collect()
    }

    /// First classified window bound to `site` (or siteless for `None`),
    /// most recently focused first, skipping `excluding`.
    pub fn window_for_site(
        &self,
        site: Option<&SiteId>,
        excluding: Option<WindowId>,
    ) -> Option<WindowId> {
        self.windows_by_recency()
            .find(|(id, record)| {
                Some(*id) != excluding && !record.unclassified && record.site.as_ref() == site
            })
            .map(|(id, _)| id)
    }

    // -- Lifecycle --

    /// Record a newly opened window as unclassified. Returns `false` if the
    /// window was already claimed (e.g. by a move that created it).
    pub fn window_opened(&mut self, id: WindowId) -> bool {
        if self.windows.contains_key(&id) {
            return false;
        }
        self.windows.insert(id, WindowRecord::unclassified());
        self.recency.push(id);
        true
    }

    /// Record a window whose type is already known.
    pub fn register_window(&mut self, id: WindowId, site: Option<SiteId>) {
        if self.windows.insert(id, WindowRecord::bound(site)).is_none() {
            self.recency.push(id);
        }
    }

    /// Forget a closed window and the tabs that were still inside it. A tab
    /// with a move in flight is on its way elsewhere and keeps its record
    /// until it attaches.
    pub fn window_closed(&mut self, id: WindowId) -> Option<WindowRecord> {
        self.recency.retain(|w| *w != id);
        self.tabs
            .retain(|_, tab| tab.window != id || tab.intent.is_moving());
        self.windows.remove(&id)
    }

    /// Move a window to the front of the recency order.
    pub fn window_focused(&mut self, id: WindowId) -> bool {
        if !self.windows.contains_key(&id) {
            return false;
        }
        self.recency.retain(|w| *w != id);
        self.recency.insert(0, id);
        true
    }

    // -- Bindings --

    /// Bind a window to `site` (or make it siteless) and mark it classified.
    /// Creates the record if missing. Returns whether the site changed.
    pub fn bind_window_to_site(&mut self, id: WindowId, site: Option<SiteId>) -> bool {
        match self.windows.get_mut(&id) {
            Some(record) => {
                record.unclassified = false;
                if record.site == site {
                    return false;
                }
                record.site = site;
                record.icon = None;
                true
            }
            None => {
                self.register_window(id, site);
                true
            }
        }
    }

    /// Re-point every window bound to `old` at `new`.
    pub fn rebind_site(&mut self, old: &SiteId, new: &SiteId) -> Vec<WindowId> {
        let mut moved = Vec::new();
        for (id, record) in self.windows.iter_mut() {
            if record.site.as_ref() == Some(old) {
                record.site = Some(new.clone());
                moved.push(*id);
            }
        }
        moved
    }

    /// Record the icon shown by the window. Returns whether it changed.
    pub fn set_window_icon(&mut self, id: WindowId, icon: &str) -> bool {
        match self.windows.get_mut(&id) {
            Some(record) if record.icon.as_deref() != Some(icon) => {
                record.icon = Some(icon.to_string());
                true
            }
            _ => false,
        }
    }
}
