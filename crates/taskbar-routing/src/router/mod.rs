//! Navigation Router: classifies each top-level navigation against the
//! installed sites and the window it happens in, and decides where it lands.

mod classify;
mod types;

#[cfg(test)]
mod tests;

pub use types::*;

use std::collections::HashMap;
use std::hash::Hasher;
use std::time::Duration;

use taskbar_common::TabId;
use taskbar_config::RoutingConfig;
use twox_hash::XxHash32;

/// Tunables for routing decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// Keep same-registrable-domain navigations in a site window.
    pub same_domain_allowance: bool,
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self::from(&RoutingConfig::default())
    }
}

impl From<&RoutingConfig> for RoutingPolicy {
    fn from(config: &RoutingConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
            same_domain_allowance: config.same_domain_allowance,
        }
    }
}

/// Stateful router. The only state it owns is the retry ledger for
/// navigations that arrived before they could be classified.
#[derive(Debug, Default)]
pub struct Router {
    policy: RoutingPolicy,
    /// Re-issue counts keyed by tab and a hash of the url.
    retries: HashMap<RetryKey, u32>,
}

impl Router {
    pub fn new(policy: RoutingPolicy) -> Self {
        Self {
            policy,
            retries: HashMap::new(),
        }
    }

    pub fn policy(&self) -> RoutingPolicy {
        self.policy
    }

    /// Navigations currently waiting on a re-issue.
    pub fn pending_retries(&self) -> usize {
        self.retries.len()
    }

    /// Drop the retry counts of a tab that closed mid-ladder. Returns how
    /// many were dropped.
    pub fn forget_tab(&mut self, tab: TabId) -> usize {
        let before = self.retries.len();
        self.retries.retain(|key, _| key.0 != tab);
        before - self.retries.len()
    }
}

type RetryKey = (TabId, u32);

fn request_key(url: &str, tab: TabId) -> RetryKey {
    let mut hasher = XxHash32::with_seed(0);
    hasher.write(url.as_bytes());
    (tab, hasher.finish() as u32)
}
