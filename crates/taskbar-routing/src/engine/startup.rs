//! Startup: load persisted state, adopt what the host already shows, then
//! open the sites that launch with the host.

use taskbar_common::SiteId;
use tracing::{info, warn};

use super::Engine;
use crate::host::WindowTarget;

impl Engine {
    /// Initialize from the store and the host. Routing stays in its
    /// not-ready state (every navigation is delayed) until this returns.
    pub async fn start(&self) {
        let store = &self.inner.store;
        let settings = match store.load_settings().await {
            Ok(Some(settings)) => settings,
            Ok(None) => self.inner.defaults.clone(),
            Err(e) => {
                warn!(error = %e, "failed to load settings, using defaults");
                self.inner.defaults.clone()
            }
        };
        let sites = match store.load_sites().await {
            Ok(sites) => sites,
            Err(e) => {
                warn!(error = %e, "failed to load installed sites");
                Vec::new()
            }
        };
        let loaded = self.mutate(|core| {
            core.settings = settings;
            core.registry.load(sites);
            core.registry.len()
        });
        info!(sites = loaded, "loaded installed sites");
        self.refresh_pins().await;

        let windows = match self.inner.host.list_windows().await {
            Ok(windows) => windows,
            Err(e) => {
                warn!(error = %e, "failed to list host windows");
                Vec::new()
            }
        };
        for snapshot in windows {
            let stored = match store.window_site(snapshot.id).await {
                Ok(site) => site,
                Err(e) => {
                    warn!(window = %snapshot.id, error = %e, "failed to read window binding");
                    None
                }
            };
            let site = self.mutate(|core| {
                let site = stored.filter(|id| {
                    let known = core.registry.contains(id);
                    if !known {
                        warn!(window = %snapshot.id, site = %id, "window bound to missing site, treating as normal");
                    }
                    known
                });
                core.tracker.register_window(snapshot.id, site.clone());
                for tab in &snapshot.tabs {
                    core.tracker.adopt_tab(tab);
                }
                site
            });
            if let Some(site) = site {
                self.bind_site_window(snapshot.id, &site).await;
            }
        }

        let windows = self.mutate(|core| {
            core.tracker.mark_ready();
            core.tracker.window_count()
        });
        info!(windows, "window manager ready");
        self.launch_sites().await;
    }

    /// Re-read pin state from the window chrome; the user may have unpinned
    /// a shortcut while the process was not running.
    async fn refresh_pins(&self) {
        let ids: Vec<SiteId> = self.read(|core| core.registry.all().map(|s| s.id.clone()).collect());
        let mut changed = false;
        for id in ids {
            if let Some(pinned) = self.query_pinned(&id).await {
                changed |= self.mutate(|core| core.registry.set_pinned(&id, pinned));
            }
        }
        if changed {
            self.persist_sites().await;
        }
    }

    async fn launch_sites(&self) {
        let launches: Vec<(SiteId, String)> = self.read(|core| {
            core.registry
                .all()
                .filter(|site| site.launch_with_host && !core.tracker.site_has_open_window(&site.id))
                .map(|site| (site.id.clone(), site.homepage.clone()))
                .collect()
        });
        for (site, homepage) in launches {
            info!(site = %site, homepage = %homepage, "launching site");
            if let Err(e) = self.inner.host.create_window(WindowTarget::Url(homepage)).await {
                warn!(site = %site, error = %e, "failed to launch site");
            }
        }
    }
}
