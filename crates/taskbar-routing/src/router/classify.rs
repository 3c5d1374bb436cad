//! The per-request state machine.

use taskbar_common::{LinkBehavior, SiteId, TabId, WindowId};
use tracing::{debug, warn};
use url::Url;

use super::{request_key, Effect, NavigationRequest, RetryKey, RouteOutcome, Router};
use crate::registry::SiteRegistry;
use crate::scope::domains_equal;
use crate::site::Site;
use crate::tracker::Tracker;

/// The parts of the requesting tab the decision depends on.
struct Source {
    tab: TabId,
    window: WindowId,
    is_new: bool,
}

impl Router {
    /// Decide the fate of one navigation. Mutates the tracker only to bind
    /// unclassified windows and to record move intents.
    pub fn route(
        &mut self,
        request: &NavigationRequest,
        registry: &SiteRegistry,
        tracker: &mut Tracker,
    ) -> RouteOutcome {
        let Some(tab_id) = request.tab else {
            return RouteOutcome::allow();
        };
        let Ok(url) = Url::parse(&request.url) else {
            return RouteOutcome::allow();
        };
        if !matches!(url.scheme(), "http" | "https") {
            return RouteOutcome::allow();
        }

        let key = request_key(&request.url, tab_id);
        let source = match tracker.tab(tab_id) {
            Some(tab) if tracker.is_ready() && tracker.pending_moves() == 0 => Source {
                tab: tab_id,
                window: tab.window,
                is_new: tab.is_new,
            },
            _ => return self.delay(key, tab_id, &request.url),
        };
        self.retries.remove(&key);

        let target = registry.first_match(&url);

        let record = tracker.window(source.window).cloned();
        let record = match record {
            Some(record) if !record.unclassified => record,
            _ => return classify_window(source.window, target, tracker),
        };

        let window_site = match &record.site {
            Some(id) => match registry.get(id) {
                Some(site) => Some(site),
                None => {
                    warn!(window = %source.window, site = %id, "window bound to missing site, treating as siteless");
                    tracker.bind_window_to_site(source.window, None);
                    None
                }
            },
            None => None,
        };

        match window_site {
            Some(site) => self.route_in_site_window(&url, site, target, &source, tracker),
            None => {
                let no_capture = tracker.tab(tab_id).is_some_and(|tab| tab.no_capture);
                match target {
                    Some(target) if target.link_behavior.captures() && !no_capture => {
                        debug!(tab = %tab_id, site = %target.id, url = %url, "capturing navigation from normal window");
                        escalate(&url, Some(target), &source, tracker)
                    }
                    _ => RouteOutcome::allow(),
                }
            }
        }
    }

    /// The request can't be classified yet: cancel it and re-issue it later,
    /// until the ceiling is reached and it is let through unclassified.
    fn delay(&mut self, key: RetryKey, tab: TabId, url: &str) -> RouteOutcome {
        let attempts = self.retries.entry(key).or_insert(0);
        if *attempts >= self.policy.max_retries {
            self.retries.remove(&key);
            warn!(tab = %tab, url = %url, "navigation still unclassifiable after retries, allowing");
            return RouteOutcome::allow();
        }
        *attempts += 1;
        debug!(tab = %tab, url = %url, attempt = *attempts, "delaying navigation");
        RouteOutcome::cancel_with(vec![Effect::Reissue {
            tab,
            url: url.to_string(),
            after: self.policy.retry_delay,
        }])
    }

    fn route_in_site_window(
        &self,
        url: &Url,
        site: &Site,
        target: Option<&Site>,
        source: &Source,
        tracker: &mut Tracker,
    ) -> RouteOutcome {
        // A URL in the window's own scope always stays, even when its
        // registrable domain differs from the homepage's.
        let own_target = target.is_some_and(|t| t.id == site.id);
        let stays = own_target
            || (self.policy.same_domain_allowance
                && target.is_none()
                && site
                    .homepage_url()
                    .is_some_and(|home| domains_equal(url, &home)));

        if stays {
            return RouteOutcome::allow();
        }
        debug!(
            tab = %source.tab,
            window_site = %site.id,
            target = ?target.map(|t| &t.id),
            url = %url,
            "navigation leaves site window"
        );
        escalate(url, target, source, tracker)
    }
}

/// First real navigation in a window decides what kind of window it is.
fn classify_window(window: WindowId, target: Option<&Site>, tracker: &mut Tracker) -> RouteOutcome {
    let site = target.map(|t| t.id.clone());
    tracker.bind_window_to_site(window, site.clone());
    match site {
        Some(site) => {
            debug!(window = %window, site = %site, "classified window as site window");
            RouteOutcome::allow_with(vec![Effect::EnsureSiteWindow { window, site }])
        }
        None => {
            debug!(window = %window, "classified window as normal window");
            RouteOutcome::allow()
        }
    }
}

/// Send a navigation somewhere other than its own window.
fn escalate(
    url: &Url,
    target: Option<&Site>,
    source: &Source,
    tracker: &mut Tracker,
) -> RouteOutcome {
    let tab = source.tab;
    let url_text = url.to_string();

    if target.is_some_and(|t| t.link_behavior == LinkBehavior::NewWindow) {
        return RouteOutcome::cancel_with(vec![
            Effect::OpenWindow { url: url_text },
            Effect::DisposeTab { tab },
        ]);
    }

    // A NoCapture site lands in a normal window.
    let dest = target.filter(|t| t.link_behavior.captures());
    let dest_id: Option<SiteId> = dest.map(|d| d.id.clone());

    // The source window never matches: it is siteless when capturing, and
    // a site window only escalates requests for other destinations.
    match tracker.window_for_site(dest_id.as_ref(), None) {
        Some(window) if dest.is_some_and(|d| d.link_behavior == LinkBehavior::CurrentTab) => {
            RouteOutcome::cancel_with(vec![
                Effect::NavigateActiveTab {
                    window,
                    url: url_text,
                },
                Effect::DisposeTab { tab },
            ])
        }
        Some(window) if source.is_new => {
            tracker.begin_move(tab, dest_id);
            RouteOutcome::allow_with(vec![Effect::MoveTab { tab, window }])
        }
        Some(window) => RouteOutcome::cancel_with(vec![
            Effect::OpenTab {
                window,
                url: url_text,
            },
            Effect::DisposeTab { tab },
        ]),
        None if source.is_new => {
            tracker.begin_move(tab, dest_id);
            RouteOutcome::allow_with(vec![Effect::MoveTabToNewWindow { tab }])
        }
        None => {
            tracker.begin_move(tab, dest_id.clone());
            RouteOutcome::cancel_with(vec![
                Effect::OpenWindowFor {
                    url: url_text,
                    site: dest_id,
                    source: tab,
                },
                Effect::DisposeTab { tab },
            ])
        }
    }
}
