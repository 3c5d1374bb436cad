use std::time::Duration;

use taskbar_common::{DetachIntent, LinkBehavior, SiteId, TabId, TabSnapshot, WindowId};
use taskbar_config::Settings;

use super::*;
use crate::registry::SiteRegistry;
use crate::scope::Scope;
use crate::site::Site;
use crate::tracker::Tracker;

struct Fixture {
    router: Router,
    registry: SiteRegistry,
    tracker: Tracker,
}

impl Fixture {
    fn new() -> Self {
        let mut tracker = Tracker::new();
        tracker.mark_ready();
        Self {
            router: Router::new(RoutingPolicy::default()),
            registry: SiteRegistry::default(),
            tracker,
        }
    }

    fn install(&mut self, scope: &str, behavior: LinkBehavior) -> SiteId {
        let mut site = Site::new(Scope::parse(scope).unwrap(), &Settings::default());
        site.link_behavior = behavior;
        let id = site.id.clone();
        self.registry.install(site).unwrap();
        id
    }

    fn window(&mut self, id: u64, site: Option<&SiteId>) {
        self.tracker.register_window(WindowId(id), site.cloned());
    }

    fn tab(&mut self, id: u64, window: u64, is_new: bool) {
        let snapshot = TabSnapshot {
            id: TabId(id),
            window: WindowId(window),
            url: None,
            icon: None,
            active: true,
            opener: None,
        };
        self.tracker.tab_opened(&snapshot);
        if !is_new {
            self.tracker.mark_interacted(TabId(id));
        }
    }

    fn route(&mut self, tab: u64, url: &str) -> RouteOutcome {
        let request = NavigationRequest::new(TabId(tab), url);
        self.router
            .route(&request, &self.registry, &mut self.tracker)
    }
}

fn allow() -> RouteOutcome {
    RouteOutcome::allow()
}

// =============================================================================
// Pass-through
// =============================================================================

#[test]
fn requests_without_a_tab_are_allowed() {
    let mut fx = Fixture::new();
    let request = NavigationRequest {
        tab: None,
        url: "https://a.com/".into(),
    };
    assert_eq!(fx.router.route(&request, &fx.registry, &mut fx.tracker), allow());
}

#[test]
fn non_web_urls_are_allowed() {
    let mut fx = Fixture::new();
    fx.window(1, None);
    fx.tab(10, 1, true);
    assert_eq!(fx.route(10, "about:preferences"), allow());
    assert_eq!(fx.route(10, "file:///tmp/x.html"), allow());
}

// =============================================================================
// Not-yet-ready guard
// =============================================================================

#[test]
fn not_ready_tracker_delays_request() {
    let mut fx = Fixture::new();
    fx.tracker = Tracker::new();
    fx.window(1, None);
    fx.tab(10, 1, true);

    let outcome = fx.route(10, "https://a.com/");
    assert_eq!(outcome.verdict, Verdict::Cancel);
    assert_eq!(
        outcome.effects,
        vec![Effect::Reissue {
            tab: TabId(10),
            url: "https://a.com/".into(),
            after: Duration::from_millis(100),
        }]
    );
    assert_eq!(fx.router.pending_retries(), 1);
}

#[test]
fn unknown_tab_is_delayed() {
    let mut fx = Fixture::new();
    let outcome = fx.route(42, "https://a.com/");
    assert_eq!(outcome.verdict, Verdict::Cancel);
}

#[test]
fn pending_move_delays_then_gives_up_after_ceiling() {
    let mut fx = Fixture::new();
    fx.window(1, None);
    fx.tab(10, 1, true);
    fx.tab(11, 1, true);
    fx.tracker.begin_move(TabId(11), None);

    for _ in 0..10 {
        assert_eq!(fx.route(10, "https://a.com/").verdict, Verdict::Cancel);
    }
    assert_eq!(fx.route(10, "https://a.com/"), allow());
    assert_eq!(fx.router.pending_retries(), 0);
}

#[test]
fn retry_ledger_is_cleared_once_classified() {
    let mut fx = Fixture::new();
    fx.window(1, None);
    fx.tab(10, 1, true);
    fx.tab(11, 1, true);
    fx.tracker.begin_move(TabId(11), None);

    assert_eq!(fx.route(10, "https://a.com/").verdict, Verdict::Cancel);
    fx.tracker.clear_intent(TabId(11));
    assert_eq!(fx.route(10, "https://a.com/"), allow());
    assert_eq!(fx.router.pending_retries(), 0);
}

#[test]
fn closed_tab_leaves_retry_ledger() {
    let mut fx = Fixture::new();
    fx.window(1, None);
    fx.tab(10, 1, true);
    fx.tab(11, 1, true);
    fx.tab(12, 1, true);
    fx.tracker.begin_move(TabId(12), None);

    fx.route(10, "https://a.com/");
    fx.route(10, "https://b.com/");
    fx.route(11, "https://a.com/");
    assert_eq!(fx.router.pending_retries(), 3);

    assert_eq!(fx.router.forget_tab(TabId(10)), 2);
    assert_eq!(fx.router.pending_retries(), 1);
    assert_eq!(fx.router.forget_tab(TabId(10)), 0);
}

// =============================================================================
// Unclassified windows
// =============================================================================

#[test]
fn unclassified_window_becomes_site_window() {
    let mut fx = Fixture::new();
    let site = fx.install("*.mail.com", LinkBehavior::NewTab);
    fx.tracker.window_opened(WindowId(1));
    fx.tab(10, 1, true);

    let outcome = fx.route(10, "https://app.mail.com/inbox");
    assert_eq!(
        outcome,
        RouteOutcome::allow_with(vec![Effect::EnsureSiteWindow {
            window: WindowId(1),
            site: site.clone(),
        }])
    );
    let record = fx.tracker.window(WindowId(1)).unwrap();
    assert_eq!(record.site, Some(site));
    assert!(!record.unclassified);
}

#[test]
fn unclassified_window_without_match_becomes_normal() {
    let mut fx = Fixture::new();
    fx.install("*.mail.com", LinkBehavior::NewTab);
    fx.tracker.window_opened(WindowId(1));
    fx.tab(10, 1, true);

    assert_eq!(fx.route(10, "https://news.org/"), allow());
    let record = fx.tracker.window(WindowId(1)).unwrap();
    assert_eq!(record.site, None);
    assert!(!record.unclassified);
}

// =============================================================================
// Normal windows
// =============================================================================

#[test]
fn normal_window_unmatched_url_stays() {
    let mut fx = Fixture::new();
    fx.install("*.mail.com", LinkBehavior::NewTab);
    fx.window(1, None);
    fx.tab(10, 1, true);

    assert_eq!(fx.route(10, "https://news.org/"), allow());
    assert_eq!(fx.tracker.window(WindowId(1)).unwrap().site, None);
}

#[test]
fn normal_window_capture_moves_new_tab_to_new_site_window() {
    let mut fx = Fixture::new();
    let site = fx.install("*.mail.com", LinkBehavior::NewTab);
    fx.window(1, None);
    fx.tab(10, 1, true);

    let outcome = fx.route(10, "https://mail.com/");
    assert_eq!(
        outcome,
        RouteOutcome::allow_with(vec![Effect::MoveTabToNewWindow { tab: TabId(10) }])
    );
    let tab = fx.tracker.tab(TabId(10)).unwrap();
    assert_eq!(tab.intent, DetachIntent::MovingToSite(site));
    assert_eq!(tab.moved_from, Some(WindowId(1)));
}

#[test]
fn normal_window_capture_of_used_tab_opens_bound_window() {
    let mut fx = Fixture::new();
    let site = fx.install("*.mail.com", LinkBehavior::NewTab);
    fx.window(1, None);
    fx.tab(10, 1, false);

    let outcome = fx.route(10, "https://mail.com/");
    assert_eq!(outcome.verdict, Verdict::Cancel);
    assert_eq!(
        outcome.effects,
        vec![
            Effect::OpenWindowFor {
                url: "https://mail.com/".into(),
                site: Some(site),
                source: TabId(10),
            },
            Effect::DisposeTab { tab: TabId(10) },
        ]
    );
    assert_eq!(fx.tracker.pending_moves(), 1);
}

#[test]
fn capture_into_existing_site_window_opens_tab_there() {
    let mut fx = Fixture::new();
    let site = fx.install("*.mail.com", LinkBehavior::NewTab);
    fx.window(1, None);
    fx.window(2, Some(&site));
    fx.tab(10, 1, false);

    let outcome = fx.route(10, "https://mail.com/x");
    assert_eq!(
        outcome,
        RouteOutcome::cancel_with(vec![
            Effect::OpenTab {
                window: WindowId(2),
                url: "https://mail.com/x".into(),
            },
            Effect::DisposeTab { tab: TabId(10) },
        ])
    );
}

#[test]
fn capture_of_new_tab_into_existing_window_moves_it() {
    let mut fx = Fixture::new();
    let site = fx.install("*.mail.com", LinkBehavior::NewTab);
    fx.window(1, None);
    fx.window(2, Some(&site));
    fx.tab(10, 1, true);

    let outcome = fx.route(10, "https://mail.com/x");
    assert_eq!(
        outcome,
        RouteOutcome::allow_with(vec![Effect::MoveTab {
            tab: TabId(10),
            window: WindowId(2),
        }])
    );
    assert!(fx.tracker.tab(TabId(10)).unwrap().intent.is_moving());
}

#[test]
fn current_tab_behavior_navigates_active_tab() {
    let mut fx = Fixture::new();
    let site = fx.install("*.mail.com", LinkBehavior::CurrentTab);
    fx.window(1, None);
    fx.window(2, Some(&site));
    fx.tab(10, 1, true);

    let outcome = fx.route(10, "https://mail.com/x");
    assert_eq!(
        outcome,
        RouteOutcome::cancel_with(vec![
            Effect::NavigateActiveTab {
                window: WindowId(2),
                url: "https://mail.com/x".into(),
            },
            Effect::DisposeTab { tab: TabId(10) },
        ])
    );
}

#[test]
fn new_window_behavior_always_opens_window() {
    let mut fx = Fixture::new();
    let site = fx.install("*.mail.com", LinkBehavior::NewWindow);
    fx.window(1, None);
    fx.window(2, Some(&site));
    fx.tab(10, 1, true);

    let outcome = fx.route(10, "https://mail.com/x");
    assert_eq!(
        outcome,
        RouteOutcome::cancel_with(vec![
            Effect::OpenWindow {
                url: "https://mail.com/x".into(),
            },
            Effect::DisposeTab { tab: TabId(10) },
        ])
    );
}

#[test]
fn no_capture_site_stays_in_normal_window() {
    let mut fx = Fixture::new();
    fx.install("*.mail.com", LinkBehavior::NoCapture);
    fx.window(1, None);
    fx.tab(10, 1, true);
    assert_eq!(fx.route(10, "https://mail.com/"), allow());
}

#[test]
fn capture_exempt_tab_is_never_captured() {
    let mut fx = Fixture::new();
    fx.install("*.mail.com", LinkBehavior::NewTab);
    fx.window(1, None);
    fx.tab(10, 1, true);
    fx.tracker.tab_mut(TabId(10)).unwrap().no_capture = true;
    assert_eq!(fx.route(10, "https://mail.com/"), allow());
}

// =============================================================================
// Site windows
// =============================================================================

#[test]
fn site_window_keeps_same_domain_navigation() {
    let mut fx = Fixture::new();
    let site = fx.install("*.app.b.com", LinkBehavior::NewTab);
    fx.window(1, Some(&site));
    fx.tab(10, 1, false);

    // Login flow on a sibling subdomain outside the scope.
    assert_eq!(fx.route(10, "https://login.b.com/auth"), allow());
    assert_eq!(fx.route(10, "https://app.b.com/home"), allow());
}

#[test]
fn site_window_keeps_own_scope_on_another_domain() {
    let mut fx = Fixture::new();
    let mut site = Site::new(Scope::parse("*.b.com").unwrap(), &Settings::default());
    site.homepage = "https://portal.example.net/".into();
    let id = site.id.clone();
    fx.registry.install(site).unwrap();
    fx.window(1, Some(&id));
    fx.window(2, None);
    fx.tab(10, 1, false);

    assert_eq!(fx.route(10, "https://app.b.com/inbox"), allow());
    assert_eq!(fx.tracker.window_count(), 2);
}

#[test]
fn site_window_sends_foreign_url_to_recent_normal_window() {
    let mut fx = Fixture::new();
    let site = fx.install("*.b.com", LinkBehavior::NewTab);
    fx.window(1, None);
    fx.window(2, None);
    fx.window(3, Some(&site));
    fx.tracker.window_focused(WindowId(2));
    fx.tab(10, 3, false);

    let outcome = fx.route(10, "https://other.org/page");
    assert_eq!(
        outcome,
        RouteOutcome::cancel_with(vec![
            Effect::OpenTab {
                window: WindowId(2),
                url: "https://other.org/page".into(),
            },
            Effect::DisposeTab { tab: TabId(10) },
        ])
    );
}

#[test]
fn site_window_without_normal_window_opens_one() {
    let mut fx = Fixture::new();
    let site = fx.install("*.b.com", LinkBehavior::NewTab);
    fx.window(3, Some(&site));
    fx.tab(10, 3, false);

    let outcome = fx.route(10, "https://other.org/");
    assert_eq!(
        outcome.effects[0],
        Effect::OpenWindowFor {
            url: "https://other.org/".into(),
            site: None,
            source: TabId(10),
        }
    );
    assert_eq!(
        fx.tracker.tab(TabId(10)).unwrap().intent,
        DetachIntent::MovingToSiteless
    );
}

#[test]
fn site_window_routes_to_other_site() {
    let mut fx = Fixture::new();
    let mail = fx.install("*.mail.com", LinkBehavior::NewTab);
    let docs = fx.install("*.docs.org", LinkBehavior::NewTab);
    fx.window(1, Some(&mail));
    fx.window(2, Some(&docs));
    fx.tab(10, 1, true);

    let outcome = fx.route(10, "https://docs.org/d/1");
    assert_eq!(
        outcome,
        RouteOutcome::allow_with(vec![Effect::MoveTab {
            tab: TabId(10),
            window: WindowId(2),
        }])
    );
    assert_eq!(
        fx.tracker.tab(TabId(10)).unwrap().intent,
        DetachIntent::MovingToSite(docs)
    );
}

#[test]
fn no_capture_target_from_site_window_goes_to_normal_window() {
    let mut fx = Fixture::new();
    let mail = fx.install("*.mail.com", LinkBehavior::NewTab);
    fx.install("*.docs.org", LinkBehavior::NoCapture);
    fx.window(1, Some(&mail));
    fx.window(2, None);
    fx.tab(10, 1, true);

    let outcome = fx.route(10, "https://docs.org/");
    assert_eq!(
        outcome,
        RouteOutcome::allow_with(vec![Effect::MoveTab {
            tab: TabId(10),
            window: WindowId(2),
        }])
    );
}

#[test]
fn strict_policy_ignores_same_domain_allowance() {
    let mut fx = Fixture::new();
    fx.router = Router::new(RoutingPolicy {
        same_domain_allowance: false,
        ..RoutingPolicy::default()
    });
    let site = fx.install("*.app.b.com", LinkBehavior::NewTab);
    fx.window(1, Some(&site));
    fx.window(2, None);
    fx.tab(10, 1, false);

    assert_eq!(fx.route(10, "https://app.b.com/"), allow());
    assert_eq!(fx.route(10, "https://login.b.com/").verdict, Verdict::Cancel);
}

#[test]
fn window_bound_to_missing_site_degrades_to_normal() {
    let mut fx = Fixture::new();
    fx.window(1, Some(&SiteId::from("404")));
    fx.tab(10, 1, true);

    assert_eq!(fx.route(10, "https://other.org/"), allow());
    assert_eq!(fx.tracker.window(WindowId(1)).unwrap().site, None);
}
