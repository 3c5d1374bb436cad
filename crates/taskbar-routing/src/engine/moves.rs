//! Moving tabs into and out of site windows on request.

use taskbar_common::{DetachIntent, HostError, LinkBehavior, SiteError, SiteId, TabId, TaskbarError};
use tracing::{debug, info};
use url::Url;

use super::Engine;
use crate::host::WindowTarget;
use crate::scope::Scope;

impl Engine {
    /// Move `tab` into the window of the site its URL belongs to, creating
    /// the window (and installing the site) if needed.
    pub async fn move_to_site(&self, tab: TabId) -> Result<SiteId, TaskbarError> {
        let host = &self.inner.host;
        let snapshot = host.get_tab(tab).await?;
        let url_text = snapshot.url.clone().unwrap_or_default();
        let url = Url::parse(&url_text).map_err(|e| SiteError::InvalidScope {
            scope: url_text.clone(),
            reason: e.to_string(),
        })?;

        let (site, reuse_window) = match self.read(|core| core.registry.first_match(&url).cloned()) {
            Some(site) => (site.id, site.link_behavior != LinkBehavior::NewWindow),
            None => {
                let scope = Scope::for_url(&url).ok_or_else(|| SiteError::InvalidScope {
                    scope: url_text.clone(),
                    reason: "url has no hostname".into(),
                })?;
                let id = self.read(|core| core.registry.check_available(&scope))?;
                (id, true)
            }
        };

        let window = self.mutate(|core| {
            if !core.tracker.tab_attached(tab, snapshot.window) {
                core.tracker.adopt_tab(&snapshot);
            }
            core.tracker.begin_move(tab, Some(site.clone()));
            if reuse_window {
                core.tracker.window_for_site(Some(&site), None)
            } else {
                None
            }
        });
        info!(tab = %tab, site = %site, window = ?window, "moving tab into site");

        let moved = match window {
            Some(window) => match host.focus_window(window).await {
                Ok(()) => host.move_tab(tab, window).await,
                Err(e) => Err(e),
            },
            None => host.create_window(WindowTarget::Tab(tab)).await.map(|_| ()),
        };
        if let Err(e) = moved {
            self.mutate(|core| core.tracker.clear_intent(tab));
            return Err(e.into());
        }
        Ok(site)
    }

    /// Move `tab` out of its site window into a normal window, then uninstall
    /// the site if that was its last window.
    pub async fn move_out_of_site(
        &self,
        tab: TabId,
        mark_no_capture: bool,
        force_new_window: bool,
    ) -> Result<(), TaskbarError> {
        let site = self.relocate_out(tab, mark_no_capture, force_new_window).await?;
        if let Some(site) = site {
            self.uninstall_if_closed(&site).await;
        }
        Ok(())
    }

    /// Send `tab` to its origin window, else the most recently focused
    /// siteless window, else a new window. Returns the site it left.
    pub(crate) async fn relocate_out(
        &self,
        tab: TabId,
        mark_no_capture: bool,
        force_new_window: bool,
    ) -> Result<Option<SiteId>, TaskbarError> {
        let host = &self.inner.host;
        let planned = self.mutate(|core| {
            let tracker = &mut core.tracker;
            let record = tracker.tab(tab)?;
            let from = record.window;
            let origin = record.moved_from;
            let site = tracker.window(from).and_then(|w| w.site.clone());

            let destination = if force_new_window {
                None
            } else {
                origin
                    .filter(|origin| *origin != from && tracker.is_tracked(*origin))
                    .or_else(|| tracker.window_for_site(None, Some(from)))
            };

            let record = tracker.tab_mut(tab)?;
            if mark_no_capture {
                record.no_capture = true;
            }
            record.intent = DetachIntent::MovingToSiteless;
            Some((site, destination))
        });
        let Some((site, destination)) = planned else {
            return Err(HostError::TabNotFound(tab).into());
        };
        debug!(tab = %tab, destination = ?destination, "moving tab out of site");

        let moved = match destination {
            Some(window) => match host.focus_window(window).await {
                Ok(()) => host.move_tab(tab, window).await,
                Err(e) => Err(e),
            },
            None => host.create_window(WindowTarget::Tab(tab)).await.map(|_| ()),
        };
        if let Err(e) = moved {
            self.mutate(|core| core.tracker.clear_intent(tab));
            return Err(e.into());
        }
        Ok(site)
    }

    /// Give the site's last window a moment to close, and uninstall the site
    /// if it did.
    pub(crate) async fn uninstall_if_closed(&self, site: &SiteId) {
        let grace = self.inner.routing.site_close_grace();
        let closed = self
            .wait_until(grace, |core| !core.tracker.site_has_open_window(site))
            .await;
        if closed {
            info!(site = %site, "site has no more windows");
            self.uninstall_site(site).await;
        }
    }
}
