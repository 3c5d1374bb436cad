//! Single-document JSON store on disk.
//!
//! Writes go to a `.tmp` sibling first and are then renamed over the real
//! file, so a crash mid-write leaves the previous document intact.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use taskbar_common::{SiteId, StoreError, WindowId};
use taskbar_config::Settings;
use tracing::{debug, info, warn};

use super::{PersistedState, Result, Store};
use crate::site::Site;

pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<PersistedState>,
    /// Serializes writers so an older snapshot never lands after a newer one.
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file starts empty; a corrupt
    /// file is logged and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<PersistedState>(&content) {
                Ok(state) => {
                    info!(
                        sites = state.sites.len(),
                        "loaded state from {}",
                        path.display()
                    );
                    state
                }
                Err(e) => {
                    warn!("ignoring unreadable state file {}: {e}", path.display());
                    PersistedState::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PersistedState::default(),
            Err(e) => return Err(StoreError::Io(e)),
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
            write_lock: tokio::sync::Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PersistedState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply `change` to the cached document and write it out.
    async fn update(&self, change: impl FnOnce(&mut PersistedState)) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let json = {
            let mut state = self.lock();
            change(&mut state);
            serde_json::to_string_pretty(&*state)?
        };

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &json).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            warn!("atomic rename failed ({e}), falling back to direct write");
            tokio::fs::write(&self.path, &json).await?;
        }

        debug!(path = %self.path.display(), "state saved to disk");
        Ok(())
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn load_sites(&self) -> Result<Vec<Site>> {
        Ok(self.lock().sites.clone())
    }

    async fn save_sites(&self, sites: &[Site]) -> Result<()> {
        let sites = sites.to_vec();
        self.update(move |state| state.sites = sites).await
    }

    async fn load_settings(&self) -> Result<Option<Settings>> {
        Ok(self.lock().settings.clone())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        let settings = settings.clone();
        self.update(move |state| state.settings = Some(settings))
            .await
    }

    async fn window_site(&self, window: WindowId) -> Result<Option<SiteId>> {
        Ok(self.lock().windows.get(&window).cloned())
    }

    async fn set_window_site(&self, window: WindowId, site: Option<&SiteId>) -> Result<()> {
        let site = site.cloned();
        self.update(move |state| state.bind(window, site.as_ref()))
            .await
    }
}
