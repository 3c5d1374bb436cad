use std::sync::Mutex;

use async_trait::async_trait;
use taskbar_common::{SiteId, WindowId};
use taskbar_config::Settings;

use super::{PersistedState, Result, Store};
use crate::site::Site;

/// Ephemeral store. State lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<PersistedState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: PersistedState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn snapshot(&self) -> PersistedState {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PersistedState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load_sites(&self) -> Result<Vec<Site>> {
        Ok(self.lock().sites.clone())
    }

    async fn save_sites(&self, sites: &[Site]) -> Result<()> {
        self.lock().sites = sites.to_vec();
        Ok(())
    }

    async fn load_settings(&self) -> Result<Option<Settings>> {
        Ok(self.lock().settings.clone())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.lock().settings = Some(settings.clone());
        Ok(())
    }

    async fn window_site(&self, window: WindowId) -> Result<Option<SiteId>> {
        Ok(self.lock().windows.get(&window).cloned())
    }

    async fn set_window_site(&self, window: WindowId, site: Option<&SiteId>) -> Result<()> {
        self.lock().bind(window, site);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load_settings().await.unwrap().is_none());

        let site = Site::new(Scope::parse("*.a.com").unwrap(), &Settings::default());
        store.save_sites(std::slice::from_ref(&site)).await.unwrap();
        assert_eq!(store.load_sites().await.unwrap(), vec![site.clone()]);

        store.set_window_site(WindowId(3), Some(&site.id)).await.unwrap();
        assert_eq!(store.window_site(WindowId(3)).await.unwrap(), Some(site.id));
        store.set_window_site(WindowId(3), None).await.unwrap();
        assert_eq!(store.window_site(WindowId(3)).await.unwrap(), None);
    }
}
