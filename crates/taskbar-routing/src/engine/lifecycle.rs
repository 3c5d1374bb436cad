//! Site Lifecycle Manager: install, uninstall, re-scope, and the window
//! chrome that comes with a site window.

use taskbar_common::{LinkBehavior, SiteError, SiteId, TaskbarError, WindowId};
use tracing::{debug, info, warn};

use super::{Core, Engine};
use crate::host::ShortcutSpec;
use crate::scope::Scope;
use crate::site::{Site, SitePatch};

impl Engine {
    /// Make `window` a window of the site for `scope`. If the site is not
    /// installed and `install` is set, install it with the current settings
    /// once the window has an icon to offer.
    pub async fn ensure_site_window(
        &self,
        window: WindowId,
        scope: &Scope,
        install: bool,
    ) -> Result<SiteId, TaskbarError> {
        let id = match self.read(|core| core.registry.check_available(scope)) {
            Err(SiteError::AlreadyInstalled(id)) => id,
            Err(e) => return Err(e.into()),
            Ok(id) if !install => return Err(SiteError::NotInstalled(id).into()),
            Ok(_) => self.install_for_window(window, scope).await?,
        };
        self.bind_site_window(window, &id).await;
        Ok(id)
    }

    async fn install_for_window(
        &self,
        window: WindowId,
        scope: &Scope,
    ) -> Result<SiteId, TaskbarError> {
        let icon = self.representative_icon(window).await;
        let mut site = self.read(|core| Site::new(scope.clone(), &core.settings));
        site.icon = icon;

        self.mutate(|core| core.registry.install(site.clone()))?;
        info!(site = %site.id, scope = %site.scope, window = %window, "installed site");
        self.persist_sites().await;
        self.create_shortcut_for(&site).await;
        Ok(site.id)
    }

    /// Bind `window` to an installed site and apply the site chrome: group
    /// id, persisted binding, icon.
    pub(crate) async fn bind_site_window(&self, window: WindowId, site: &SiteId) {
        let site_icon = self.mutate(|core| {
            core.tracker.bind_window_to_site(window, Some(site.clone()));
            core.registry.get(site).and_then(|s| s.icon.clone())
        });

        let token = self.group_token(site);
        if let Err(e) = self.inner.chrome.set_group_id(window, &token).await {
            warn!(window = %window, error = %e, "failed to set window group");
        }
        if let Err(e) = self.inner.store.set_window_site(window, Some(site)).await {
            warn!(window = %window, error = %e, "failed to persist window binding");
        }

        let icon = self.read(|core| active_icon(core, window)).or(site_icon);
        if let Some(icon) = icon {
            self.apply_window_icon(window, &icon).await;
        }
        debug!(window = %window, site = %site, "window is a site window");
    }

    /// Remove a site and its launcher shortcut. Open windows are left alone;
    /// they turn siteless as the router next sees them.
    pub async fn uninstall_site(&self, id: &SiteId) -> Option<Site> {
        let removed = self.mutate(|core| core.registry.uninstall(id))?;
        info!(site = %id, "uninstalled site");
        if let Err(e) = self
            .inner
            .chrome
            .delete_shortcut(&removed.id, &removed.display_name, true)
            .await
        {
            warn!(site = %id, error = %e, "failed to delete shortcut");
        }
        self.persist_sites().await;
        Some(removed)
    }

    /// Replace the scope of the site bound to `window`. The site is
    /// uninstalled and reinstalled under the id of the new scope; tabs that
    /// fall outside the new scope move out to a normal window.
    pub async fn update_scope(&self, window: WindowId, new_scope: &str) -> Result<Site, TaskbarError> {
        let old = self.site_for_window(window).ok_or_else(|| {
            TaskbarError::Other(format!("window {window} is not a site window"))
        })?;
        let scope = Scope::parse(new_scope)?;
        let options = self.read(|core| core.registry.options());

        let current = self.inner.host.query_active_tab(window).await?;
        let current_url = current.url.unwrap_or_default();
        if !scope.matches_str(&current_url, options) {
            return Err(SiteError::ScopeExcludesCurrentPage {
                url: current_url,
                scope: scope.to_string(),
            }
            .into());
        }
        let new_id = self.read(|core| core.registry.check_available(&scope))?;
        info!(old = %old.id, new = %new_id, scope = %scope, "changing site scope");

        // The old site must not capture the tabs that are leaving it.
        self.mutate(|core| {
            let patch = SitePatch {
                link_behavior: Some(LinkBehavior::NoCapture),
                ..SitePatch::default()
            };
            core.registry.update(&old.id, patch).map(|_| ())
        })?;

        let windows = self.read(|core| core.tracker.windows_for_site(&old.id));
        for site_window in windows {
            let tabs = match self.inner.host.query_tabs(site_window).await {
                Ok(tabs) => tabs,
                Err(e) => {
                    warn!(window = %site_window, error = %e, "failed to list tabs for scope change");
                    continue;
                }
            };
            for tab in tabs {
                let stays = tab
                    .url
                    .as_deref()
                    .is_some_and(|url| scope.matches_str(url, options));
                if !stays {
                    debug!(tab = %tab.id, "tab outside new scope, moving out");
                    if let Err(e) = self.relocate_out(tab.id, false, false).await {
                        warn!(tab = %tab.id, error = %e, "failed to move tab out of site");
                    }
                }
            }
        }

        let homepage = match old.homepage_url() {
            Some(url) if scope.matches(&url, options) => old.homepage.clone(),
            _ => scope.homepage(),
        };
        let pinned = self.query_pinned(&old.id).await.unwrap_or(old.pinned);
        let icon = self.representative_icon(window).await.or(old.icon.clone());

        let site = Site {
            id: new_id.clone(),
            display_name: scope.display_name(),
            scope,
            homepage,
            link_behavior: old.link_behavior,
            launch_with_host: old.launch_with_host,
            new_tab_homepage: old.new_tab_homepage,
            pinned,
            icon,
        };

        // Swap the records and re-point the windows in one step so routing
        // never sees a window bound to a missing site.
        let rebound = self.mutate(|core| {
            core.registry.uninstall(&old.id);
            if let Err(e) = core.registry.install(site.clone()) {
                if core.registry.install(old.clone()).is_err() {
                    warn!(site = %old.id, "failed to restore site after rejected scope change");
                }
                return Err(e);
            }
            Ok(core.tracker.rebind_site(&old.id, &new_id))
        })?;

        if let Err(e) = self
            .inner
            .chrome
            .delete_shortcut(&old.id, &old.display_name, true)
            .await
        {
            warn!(site = %old.id, error = %e, "failed to delete shortcut");
        }
        self.persist_sites().await;
        self.create_shortcut_for(&site).await;

        let token = self.group_token(&new_id);
        for site_window in rebound {
            if let Err(e) = self.inner.chrome.set_group_id(site_window, &token).await {
                warn!(window = %site_window, error = %e, "failed to set window group");
            }
            if let Err(e) = self.inner.store.set_window_site(site_window, Some(&new_id)).await {
                warn!(window = %site_window, error = %e, "failed to persist window binding");
            }
        }
        Ok(site)
    }

    // -- Shortcuts --

    pub(crate) async fn create_shortcut_for(&self, site: &Site) {
        let spec = ShortcutSpec {
            site: site.id.clone(),
            display_name: site.display_name.clone(),
            args: ShortcutSpec::args_for_homepage(&site.homepage),
            icon: site.icon.clone(),
            group_token: self.group_token(&site.id),
            pin: site.pinned,
        };
        if let Err(e) = self.inner.chrome.create_shortcut(&spec).await {
            warn!(site = %site.id, error = %e, "failed to create shortcut");
        }
    }

    /// Rebuild the shortcut after its name or target changed. `previous` is
    /// the display name the old shortcut was created under.
    pub(crate) async fn recreate_shortcut(&self, site: &SiteId, previous: &str, window: WindowId) {
        if let Some(pinned) = self.query_pinned(site).await {
            self.mutate(|core| core.registry.set_pinned(site, pinned));
        }
        if let Some(icon) = self.representative_icon(window).await {
            self.mutate(|core| core.registry.set_icon(site, Some(icon)));
        }
        let Some(current) = self.read(|core| core.registry.get(site).cloned()) else {
            return;
        };
        if let Err(e) = self.inner.chrome.delete_shortcut(site, previous, false).await {
            warn!(site = %site, error = %e, "failed to delete shortcut");
        }
        self.create_shortcut_for(&current).await;
        self.persist_sites().await;
    }

    pub(crate) async fn query_pinned(&self, site: &SiteId) -> Option<bool> {
        match self.inner.chrome.is_pinned(&self.group_token(site)).await {
            Ok(pinned) => Some(pinned),
            Err(e) => {
                warn!(site = %site, error = %e, "failed to query pin state");
                None
            }
        }
    }

    // -- Icons --

    /// The icon a window currently shows: the active tab's icon, waiting up
    /// to the icon timeout for one to arrive, else the configured default.
    pub(crate) async fn representative_icon(&self, window: WindowId) -> Option<String> {
        match self.inner.host.query_active_tab(window).await {
            Ok(tab) => {
                if let Some(icon) = tab.icon.filter(|icon| !icon.is_empty()) {
                    return Some(icon);
                }
            }
            Err(e) => debug!(window = %window, error = %e, "no active tab to take an icon from"),
        }

        let timeout = self.inner.routing.icon_timeout();
        if self
            .wait_until(timeout, move |core| active_icon(core, window).is_some())
            .await
        {
            return self.read(|core| active_icon(core, window));
        }
        debug!(window = %window, "no icon arrived, using default");
        let fallback = &self.inner.chrome_config.default_icon;
        (!fallback.is_empty()).then(|| fallback.clone())
    }

    /// Show the active tab's icon on a site window if it changed.
    pub(crate) async fn refresh_window_icon(&self, window: WindowId) {
        let icon = self.read(|core| {
            let record = core.tracker.window(window)?;
            if !record.is_site_window() {
                return None;
            }
            let tab = core.tracker.tab(core.tracker.active_tab(window)?)?;
            if !tab.url.as_deref().is_some_and(|url| url.starts_with("http")) {
                return None;
            }
            tab.icon.clone().filter(|icon| !icon.is_empty())
        });
        if let Some(icon) = icon {
            self.apply_window_icon(window, &icon).await;
        }
    }

    async fn apply_window_icon(&self, window: WindowId, icon: &str) {
        if !self.mutate(|core| core.tracker.set_window_icon(window, icon)) {
            return;
        }
        debug!(window = %window, icon = %icon, "updating window icon");
        if let Err(e) = self.inner.chrome.set_window_icon(window, icon).await {
            warn!(window = %window, error = %e, "failed to set window icon");
        }
    }

    // -- Persistence --

    pub(crate) async fn persist_sites(&self) {
        let sites: Vec<Site> = self.read(|core| core.registry.all().cloned().collect());
        if let Err(e) = self.inner.store.save_sites(&sites).await {
            warn!(error = %e, "failed to persist sites");
        }
    }

    /// The installed site bound to `window`, if any.
    pub fn site_for_window(&self, window: WindowId) -> Option<Site> {
        self.read(|core| {
            let id = core.tracker.window(window)?.site.as_ref()?;
            core.registry.get(id).cloned()
        })
    }
}

fn active_icon(core: &Core, window: WindowId) -> Option<String> {
    let tab = core.tracker.active_tab(window)?;
    core.tracker
        .tab(tab)?
        .icon
        .clone()
        .filter(|icon| !icon.is_empty())
}
