//! Host event handling.
//!
//! Each event updates the tracker synchronously, in arrival order, and then
//! hands any waiting or host calls to a background task.

use std::future::Future;

use taskbar_common::{
    DetachIntent, HostEvent, LinkBehavior, TabChange, TabId, TabSnapshot, TaskbarError, WindowId,
};
use tracing::{debug, warn};
use url::Url;

use super::effects::BLANK_PAGE;
use super::{Engine, Pending};
use crate::host::WindowTarget;
use crate::scope::{domains_equal, Scope};

impl Engine {
    pub fn on_event(&self, event: HostEvent) -> Pending {
        debug!(event = event.kind(), "host event");
        match event {
            HostEvent::WindowOpened { window } => {
                self.background(move |engine| async move { engine.window_opened(window).await })
            }
            HostEvent::WindowClosed { window } => {
                let record = self.mutate(|core| core.tracker.window_closed(window));
                match record.and_then(|record| record.site) {
                    Some(site) => {
                        debug!(window = %window, site = %site, "site window closed");
                        self.background(move |engine| async move {
                            if let Err(e) = engine.inner.store.set_window_site(window, None).await {
                                warn!(window = %window, error = %e, "failed to clear window binding");
                            }
                        })
                    }
                    None => Pending::none(),
                }
            }
            HostEvent::WindowFocused { window } => {
                self.mutate(|core| core.tracker.window_focused(window));
                Pending::none()
            }
            HostEvent::TabOpened { tab } => self.tab_opened(tab),
            HostEvent::TabClosed { tab } => {
                let dropped = self.mutate(|core| {
                    core.tracker.tab_closed(tab);
                    core.router.forget_tab(tab)
                });
                if dropped > 0 {
                    debug!(tab = %tab, dropped, "closed tab had delayed navigations");
                }
                Pending::none()
            }
            HostEvent::TabDetached { tab, old_window } => {
                let intent = self.mutate(|core| core.tracker.tab_detached(tab, old_window).cloned());
                debug!(tab = %tab, old_window = %old_window, intent = ?intent, "tab detached");
                Pending::none()
            }
            HostEvent::TabAttached { tab, new_window } => {
                self.mutate(|core| core.tracker.tab_attached(tab, new_window));
                self.background(move |engine| async move { engine.tab_attached(tab, new_window).await })
            }
            HostEvent::TabActivated { tab, window } => {
                self.mutate(|core| core.tracker.set_active(tab, window));
                self.background(move |engine| async move { engine.refresh_window_icon(window).await })
            }
            HostEvent::TabUpdated { tab, window, change } => self.tab_updated(tab, window, change),
            HostEvent::TabInteraction { tab } => {
                self.mutate(|core| core.tracker.mark_interacted(tab));
                Pending::none()
            }
        }
    }

    fn background<F, Fut>(&self, work: F) -> Pending
    where
        F: FnOnce(Engine) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Pending::spawn(work(self.clone()))
    }

    // -- Windows --

    /// A window opened while a move is in flight probably belongs to that
    /// move, so let the moves settle before recording it as unclassified.
    async fn window_opened(&self, window: WindowId) {
        let timeout = self.inner.routing.settle_timeout();
        let settled = self
            .wait_until(timeout, |core| core.tracker.pending_moves() == 0)
            .await;
        if !settled {
            let reset = self.mutate(|core| core.tracker.reset_intents());
            warn!(window = %window, reset, "moves did not settle, dropping their intents");
        }
        if self.mutate(|core| core.tracker.window_opened(window)) {
            debug!(window = %window, "recorded unclassified window");
        }
    }

    // -- Tabs --

    fn tab_opened(&self, snapshot: TabSnapshot) -> Pending {
        let tab = snapshot.id;
        let needs_handling = self.mutate(|core| {
            let tracker = &mut core.tracker;
            tracker.tab_opened(&snapshot);
            let in_site_window = tracker
                .window(snapshot.window)
                .is_some_and(|record| record.is_site_window());
            if !in_site_window {
                return false;
            }

            // New tabs in a site window go back where their opener came from.
            let inherited = snapshot
                .opener
                .and_then(|opener| tracker.tab(opener))
                .and_then(|opener| opener.moved_from);
            let blank = snapshot.url.as_deref().map_or(true, |url| url == BLANK_PAGE);
            if let Some(record) = tracker.tab_mut(tab) {
                record.moved_from = inherited;
                record.blank = blank;
            }
            !blank
        });

        if needs_handling {
            self.background(move |engine| async move { engine.handle_new_site_tab(tab).await })
        } else {
            Pending::none()
        }
    }

    fn tab_updated(&self, tab: TabId, window: WindowId, change: TabChange) -> Pending {
        let needs_handling = self.mutate(|core| {
            let tracker = &mut core.tracker;
            let mut first_url = false;
            if let Some(url) = &change.url {
                if let Some(record) = tracker.tab_mut(tab) {
                    record.window = window;
                    record.url = Some(url.clone());
                    if url != BLANK_PAGE && record.blank {
                        record.blank = false;
                        first_url = true;
                    }
                }
            }
            if let Some(icon) = &change.icon {
                if let Some(record) = tracker.tab_mut(tab) {
                    record.icon = Some(icon.clone());
                }
            }
            first_url
        });

        self.background(move |engine| async move {
            if needs_handling {
                engine.handle_new_site_tab(tab).await;
            }
            engine.refresh_window_icon(window).await;
        })
    }

    /// A tab that shows up in a site window may not belong there: new-tab
    /// pages, launches the OS routed to a random window, and new-window
    /// sites all need a different home.
    async fn handle_new_site_tab(&self, tab: TabId) {
        let context = self.read(|core| {
            let record = core.tracker.tab(tab)?;
            let site_id = core.tracker.window(record.window)?.site.as_ref()?;
            let site = core.registry.get(site_id)?.clone();
            Some((record.window, site, record.url.clone().unwrap_or_default(), record.opener))
        });
        let Some((window, site, url_text, opener)) = context else {
            return;
        };

        let new_tab_page = self.inner.routing.is_new_tab_page(&url_text);
        let url = Url::parse(&url_text).ok();
        let web = url
            .as_ref()
            .is_some_and(|url| matches!(url.scheme(), "http" | "https"));
        if !web && !new_tab_page {
            return;
        }

        let mut was_new_tab_page = false;
        if new_tab_page {
            if !site.new_tab_homepage {
                debug!(tab = %tab, site = %site.id, "new tab page in site window, moving out");
                if let Err(e) = self.move_out_of_site(tab, false, true).await {
                    warn!(tab = %tab, error = %e, "failed to move new tab out of site");
                }
                return;
            }
            debug!(tab = %tab, site = %site.id, "new tab page in site window, opening homepage");
            if let Err(e) = self.inner.host.navigate_tab(tab, &site.homepage).await {
                warn!(tab = %tab, error = %e, "failed to open site homepage");
            }
            self.mutate(|core| core.tracker.mark_interacted(tab));
            was_new_tab_page = true;
        }

        let same_domain = match (&url, site.homepage_url()) {
            (Some(url), Some(home)) => domains_equal(url, &home),
            _ => false,
        };

        if site.link_behavior == LinkBehavior::NewWindow && (was_new_tab_page || same_domain) {
            debug!(tab = %tab, site = %site.id, "new-window site, giving tab its own window");
            self.mutate(|core| {
                if let Some(record) = core.tracker.tab_mut(tab) {
                    record.moved_from = Some(window);
                    record.intent = DetachIntent::MovingToSite(site.id.clone());
                }
            });
            if let Err(e) = self.inner.host.create_window(WindowTarget::Tab(tab)).await {
                self.mutate(|core| core.tracker.clear_intent(tab));
                warn!(tab = %tab, error = %e, "failed to open new site window");
            }
            return;
        }

        if !was_new_tab_page && opener.is_none() && !same_domain {
            debug!(tab = %tab, site = %site.id, "unrelated tab landed in site window, moving out");
            if let Err(e) = self.move_out_of_site(tab, false, false).await {
                warn!(tab = %tab, error = %e, "failed to move tab out of site");
            }
        }
    }

    /// Every move ends here. The tab's intent says what kind of window it was
    /// headed for; the destination either takes it or bounces it.
    async fn tab_attached(&self, tab: TabId, window: WindowId) {
        let timeout = self.inner.routing.settle_timeout();
        let has_intent = self
            .wait_until(timeout, |core| {
                core.tracker.tab(tab).is_some_and(|record| record.intent.is_moving())
            })
            .await;
        if !has_intent {
            self.mutate(|core| {
                if !core.tracker.is_tracked(window) {
                    core.tracker.window_opened(window);
                }
            });
            debug!(tab = %tab, window = %window, "attached without a move intent");
            return;
        }

        let (intent, new_window) = self.read(|core| {
            let intent = core
                .tracker
                .tab(tab)
                .map(|record| record.intent.clone())
                .unwrap_or_default();
            let new_window = core
                .tracker
                .window(window)
                .map_or(true, |record| record.unclassified);
            (intent, new_window)
        });

        if new_window {
            self.adopt_new_window(tab, window, intent).await;
        } else {
            self.offer_tab(tab, window, intent).await;
        }
    }

    /// The tab created `window`; the window takes the kind of its intent.
    async fn adopt_new_window(&self, tab: TabId, window: WindowId, intent: DetachIntent) {
        let site = intent.site().cloned();
        let installed = self.mutate(|core| {
            core.tracker.bind_window_to_site(window, site.clone());
            let record = core.tracker.tab_mut(tab);
            if let Some(record) = record {
                record.intent = DetachIntent::NotMoving;
                if site.is_none() {
                    record.moved_from = None;
                }
            }
            site.as_ref().map(|id| core.registry.contains(id))
        });

        let Some(site) = site else {
            debug!(tab = %tab, window = %window, "tab opened a new normal window");
            return;
        };
        debug!(tab = %tab, window = %window, site = %site, "tab opened a new site window");

        if installed == Some(true) {
            self.bind_site_window(window, &site).await;
            return;
        }

        // The site went away mid-move: install one from the tab's own URL.
        let scope = match self.inner.host.get_tab(tab).await {
            Ok(snapshot) => snapshot
                .url
                .as_deref()
                .and_then(|url| Url::parse(url).ok())
                .and_then(|url| Scope::for_url(&url)),
            Err(e) => {
                warn!(tab = %tab, error = %e, "failed to read tab for site install");
                None
            }
        };
        let result = match scope {
            Some(scope) => self.ensure_site_window(window, &scope, true).await.map(|_| ()),
            None => Err(TaskbarError::Other(format!(
                "tab {tab} has no url to derive a scope from"
            ))),
        };
        if let Err(e) = result {
            warn!(window = %window, error = %e, "could not make site window, treating as normal");
            self.mutate(|core| core.tracker.bind_window_to_site(window, None));
        }
    }

    /// The tab was dropped on an existing window, which accepts it if it is a
    /// normal window, belongs to the tab's site, or covers the tab's URL.
    async fn offer_tab(&self, tab: TabId, window: WindowId, intent: DetachIntent) {
        let host = &self.inner.host;
        let url = match host.get_tab(tab).await {
            Ok(snapshot) => snapshot.url.and_then(|url| Url::parse(&url).ok()),
            Err(e) => {
                warn!(tab = %tab, error = %e, "attached tab vanished");
                self.mutate(|core| core.tracker.clear_intent(tab));
                return;
            }
        };

        let accepted = self.mutate(|core| {
            let window_site = core.tracker.window(window).and_then(|record| record.site.clone());
            let accepts = match &window_site {
                None => true,
                Some(site) if Some(site) == intent.site() => true,
                Some(site) => url.as_ref().is_some_and(|url| core.registry.in_scope(site, url)),
            };
            let Some(record) = core.tracker.tab_mut(tab) else {
                return accepts;
            };
            if accepts {
                record.intent = DetachIntent::NotMoving;
                if window_site.is_none() {
                    record.moved_from = None;
                    // Pulled out of a site: don't capture it straight back.
                    if intent.site().is_some() {
                        record.no_capture = true;
                    }
                }
            } else {
                record.intent = DetachIntent::MovingToSiteless;
                record.no_capture = true;
                record.moved_from = None;
            }
            accepts
        });

        if accepted {
            debug!(tab = %tab, window = %window, "window accepted tab");
            self.refresh_window_icon(window).await;
            if let Err(e) = host.focus_window(window).await {
                warn!(window = %window, error = %e, "failed to focus window");
            }
            if let Err(e) = host.activate_tab(tab).await {
                warn!(tab = %tab, error = %e, "failed to activate tab");
            }
            return;
        }

        debug!(tab = %tab, window = %window, "window rejected tab, giving it a normal window");
        if let Err(e) = host.create_window(WindowTarget::Tab(tab)).await {
            self.mutate(|core| core.tracker.clear_intent(tab));
            warn!(tab = %tab, error = %e, "failed to open window for rejected tab");
        }
    }
}
