//! The Engine drives everything else. It feeds host events and navigation
//! requests to the tracker and router, and performs the resulting side
//! effects against the host, the window chrome and the store.
//!
//! All routing state lives in one [`Core`] behind a lock that is never held
//! across an `.await`. Every mutation bumps a revision counter so that
//! asynchronous work can wait for a state transition instead of polling.

mod effects;
mod events;
mod lifecycle;
mod management;
mod moves;
mod startup;
mod wait;


pub use management::{ManagementRequest, ManagementResponse, SiteChange, WindowView};

use std::future::Future;
use std::sync::{Arc, Mutex};

use taskbar_common::SiteId;
use taskbar_config::{ChromeConfig, RoutingConfig, Settings, TaskbarConfig};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::host::{BrowserHost, WindowChrome};
use crate::registry::SiteRegistry;
use crate::router::{Router, RoutingPolicy, Verdict};
use crate::scope::MatchOptions;
use crate::store::Store;
use crate::tracker::Tracker;

/// Owned routing state.
#[derive(Debug)]
pub struct Core {
    pub registry: SiteRegistry,
    pub tracker: Tracker,
    pub router: Router,
    /// Process-wide settings, as persisted.
    pub settings: Settings,
}

/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<Inner>,
}

struct Inner {
    core: Mutex<Core>,
    revision: watch::Sender<u64>,
    host: Arc<dyn BrowserHost>,
    chrome: Arc<dyn WindowChrome>,
    store: Arc<dyn Store>,
    routing: RoutingConfig,
    chrome_config: ChromeConfig,
    /// Settings used until the store provides its own.
    defaults: Settings,
}

/// Background work started by an engine call. Dropping it detaches the
/// work; tests await [`Pending::settled`] to observe its effects.
#[derive(Debug, Default)]
pub struct Pending(Option<JoinHandle<()>>);

impl Pending {
    pub fn none() -> Self {
        Self(None)
    }

    pub(crate) fn spawn<F>(work: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self(Some(tokio::spawn(work)))
    }

    pub fn is_idle(&self) -> bool {
        self.0.is_none()
    }

    /// Wait for the background work to finish.
    pub async fn settled(self) {
        if let Some(handle) = self.0 {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "engine task failed");
            }
        }
    }
}

/// Answer to a navigation request, plus the side effects it started.
#[derive(Debug)]
pub struct Decision {
    pub verdict: Verdict,
    pub pending: Pending,
}

impl Engine {
    pub fn new(
        config: &TaskbarConfig,
        host: Arc<dyn BrowserHost>,
        chrome: Arc<dyn WindowChrome>,
        store: Arc<dyn Store>,
    ) -> Self {
        let options = MatchOptions {
            wildcard_includes_apex: config.routing.wildcard_includes_apex,
        };
        let core = Core {
            registry: SiteRegistry::new(options),
            tracker: Tracker::new(),
            router: Router::new(RoutingPolicy::from(&config.routing)),
            settings: config.defaults.clone(),
        };
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                core: Mutex::new(core),
                revision,
                host,
                chrome,
                store,
                routing: config.routing.clone(),
                chrome_config: config.chrome.clone(),
                defaults: config.defaults.clone(),
            }),
        }
    }

    // -- Accessors --

    pub fn host(&self) -> &Arc<dyn BrowserHost> {
        &self.inner.host
    }

    pub fn routing_config(&self) -> &RoutingConfig {
        &self.inner.routing
    }

    /// Token that groups the windows of `site` on the taskbar.
    pub fn group_token(&self, site: &SiteId) -> String {
        format!("{}{}", self.inner.chrome_config.group_prefix, site)
    }

    pub fn settings(&self) -> Settings {
        self.read(|core| core.settings.clone())
    }
}
