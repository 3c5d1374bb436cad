//! Persistent Store: the site registry blob, the settings blob, and the
//! window to site bindings that survive a restart.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use taskbar_common::{SiteId, StoreError, WindowId};
use taskbar_config::Settings;

use crate::site::Site;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Everything the store keeps, as one serializable document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub sites: Vec<Site>,
    pub settings: Option<Settings>,
    pub windows: BTreeMap<WindowId, SiteId>,
}

impl PersistedState {
    fn bind(&mut self, window: WindowId, site: Option<&SiteId>) {
        match site {
            Some(site) => {
                self.windows.insert(window, site.clone());
            }
            None => {
                self.windows.remove(&window);
            }
        }
    }
}

/// Reads happen once at startup; writes are fire-and-forget.
#[async_trait]
pub trait Store: Send + Sync {
    async fn load_sites(&self) -> Result<Vec<Site>>;
    async fn save_sites(&self, sites: &[Site]) -> Result<()>;
    async fn load_settings(&self) -> Result<Option<Settings>>;
    async fn save_settings(&self, settings: &Settings) -> Result<()>;
    async fn window_site(&self, window: WindowId) -> Result<Option<SiteId>>;
    async fn set_window_site(&self, window: WindowId, site: Option<&SiteId>) -> Result<()>;
}
