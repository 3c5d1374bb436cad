//! Management UI requests. Purely request/response: every answer is built
//! from engine operations defined elsewhere.

use serde::{Deserialize, Serialize};
use taskbar_common::{LinkBehavior, SiteError, SiteId, TabId, TaskbarError, WindowId};
use taskbar_config::Settings;
use tracing::{info, warn};

use super::Engine;
use crate::host::WindowTarget;
use crate::site::{Site, SitePatch};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ManagementRequest {
    /// Settings, installed sites and open windows.
    GetSnapshot,
    UpdateSettings { settings: Settings },
    /// Focus the site's window, or open its homepage if it has none.
    ActivateSite { site: SiteId },
    UninstallSite { site: SiteId },
    GetSiteForWindow { window: WindowId },
    UpdateSite { window: WindowId, change: SiteChange },
    MoveToSite { tab: TabId },
    MoveOutOfSite { tab: TabId },
}

/// One edit to the site of a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "property", content = "value", rename_all = "snake_case")]
pub enum SiteChange {
    DisplayName(String),
    Scope(String),
    Homepage(String),
    LinkBehavior(LinkBehavior),
    LaunchWithHost(bool),
    NewTabHomepage(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowView {
    pub window: WindowId,
    pub site: Option<SiteId>,
    pub unclassified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ManagementResponse {
    Snapshot {
        settings: Settings,
        sites: Vec<Site>,
        /// Most recently focused first.
        windows: Vec<WindowView>,
    },
    /// The site after an edit. A rejected edit carries the unchanged site
    /// and the reason.
    Site {
        site: Option<Site>,
        error: Option<String>,
    },
    Ok,
    Error {
        message: String,
    },
}

impl ManagementResponse {
    fn from_result(result: Result<(), TaskbarError>) -> Self {
        match result {
            Ok(()) => ManagementResponse::Ok,
            Err(e) => ManagementResponse::Error {
                message: e.to_string(),
            },
        }
    }
}

impl Engine {
    pub async fn handle_management(&self, request: ManagementRequest) -> ManagementResponse {
        match request {
            ManagementRequest::GetSnapshot => self.snapshot(),
            ManagementRequest::UpdateSettings { settings } => {
                self.update_settings(settings).await;
                self.snapshot()
            }
            ManagementRequest::ActivateSite { site } => {
                ManagementResponse::from_result(self.activate_site(&site).await)
            }
            ManagementRequest::UninstallSite { site } => {
                self.uninstall_from_ui(&site).await;
                self.snapshot()
            }
            ManagementRequest::GetSiteForWindow { window } => match self.site_for_window(window) {
                Some(site) => ManagementResponse::Site {
                    site: Some(site),
                    error: None,
                },
                None => ManagementResponse::Error {
                    message: format!("window {window} is not a site window"),
                },
            },
            ManagementRequest::UpdateSite { window, change } => {
                let result = self.update_site(window, change).await;
                let error = result.err().map(|e| e.to_string());
                ManagementResponse::Site {
                    site: self.site_for_window(window),
                    error,
                }
            }
            ManagementRequest::MoveToSite { tab } => {
                ManagementResponse::from_result(self.move_to_site(tab).await.map(|_| ()))
            }
            ManagementRequest::MoveOutOfSite { tab } => {
                ManagementResponse::from_result(self.move_out_of_site(tab, true, false).await)
            }
        }
    }

    fn snapshot(&self) -> ManagementResponse {
        self.read(|core| ManagementResponse::Snapshot {
            settings: core.settings.clone(),
            sites: core.registry.all().cloned().collect(),
            windows: core
                .tracker
                .windows_by_recency()
                .map(|(window, record)| WindowView {
                    window,
                    site: record.site.clone(),
                    unclassified: record.unclassified,
                })
                .collect(),
        })
    }

    pub async fn update_settings(&self, settings: Settings) {
        info!(settings = ?settings, "updating settings");
        self.mutate(|core| core.settings = settings.clone());
        if let Err(e) = self.inner.store.save_settings(&settings).await {
            warn!(error = %e, "failed to persist settings");
        }
    }

    pub async fn activate_site(&self, site: &SiteId) -> Result<(), TaskbarError> {
        let host = &self.inner.host;
        let (window, homepage) = self.read(|core| {
            let homepage = core.registry.get(site).map(|s| s.homepage.clone());
            (core.tracker.window_for_site(Some(site), None), homepage)
        });
        match (window, homepage) {
            (Some(window), _) => {
                host.focus_window(window).await?;
                let active = host.query_active_tab(window).await?;
                host.activate_tab(active.id).await?;
            }
            (None, Some(homepage)) => {
                host.create_window(WindowTarget::Url(homepage)).await?;
            }
            (None, None) => return Err(SiteError::NotInstalled(site.clone()).into()),
        }
        Ok(())
    }

    /// Move every tab out of the site's windows; the site goes once its last
    /// window has closed, or right away if it has none.
    pub async fn uninstall_from_ui(&self, site: &SiteId) {
        let windows = self.read(|core| core.tracker.windows_for_site(site));
        if windows.is_empty() {
            self.uninstall_site(site).await;
            return;
        }
        for window in windows {
            let tabs = match self.inner.host.query_tabs(window).await {
                Ok(tabs) => tabs,
                Err(e) => {
                    warn!(window = %window, error = %e, "failed to list tabs for uninstall");
                    continue;
                }
            };
            for tab in tabs {
                if let Err(e) = self.relocate_out(tab.id, false, false).await {
                    warn!(tab = %tab.id, error = %e, "failed to move tab out of site");
                }
            }
        }
        self.uninstall_if_closed(site).await;
    }

    /// Apply one edit to the site bound to `window`. Invalid input leaves the
    /// site untouched.
    pub async fn update_site(&self, window: WindowId, change: SiteChange) -> Result<(), TaskbarError> {
        let site = self.site_for_window(window).ok_or_else(|| {
            TaskbarError::Other(format!("window {window} is not a site window"))
        })?;

        let (patch, shortcut_changes) = match change {
            SiteChange::Scope(scope) => {
                self.update_scope(window, &scope).await?;
                return Ok(());
            }
            SiteChange::DisplayName(name) => (
                SitePatch {
                    display_name: Some(name),
                    ..SitePatch::default()
                },
                true,
            ),
            SiteChange::Homepage(homepage) => (
                SitePatch {
                    homepage: Some(homepage),
                    ..SitePatch::default()
                },
                true,
            ),
            SiteChange::LinkBehavior(behavior) => (
                SitePatch {
                    link_behavior: Some(behavior),
                    ..SitePatch::default()
                },
                false,
            ),
            SiteChange::LaunchWithHost(launch) => (
                SitePatch {
                    launch_with_host: Some(launch),
                    ..SitePatch::default()
                },
                false,
            ),
            SiteChange::NewTabHomepage(new_tab) => (
                SitePatch {
                    new_tab_homepage: Some(new_tab),
                    ..SitePatch::default()
                },
                false,
            ),
        };

        self.mutate(|core| core.registry.update(&site.id, patch).map(|_| ()))?;
        info!(site = %site.id, "updated site");
        if shortcut_changes {
            self.recreate_shortcut(&site.id, &site.display_name, window).await;
        } else {
            self.persist_sites().await;
        }
        Ok(())
    }
}
