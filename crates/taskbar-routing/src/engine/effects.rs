//! Navigation decisions and the side effects that follow them.

use taskbar_common::{TabId, TaskbarError};
use tracing::{debug, warn};

use super::{Decision, Engine, Pending};
use crate::host::WindowTarget;
use crate::router::{Effect, NavigationRequest};

/// Content of a tab that was opened but never navigated.
pub(super) const BLANK_PAGE: &str = "about:blank";

impl Engine {
    /// Classify a navigation. The verdict is computed synchronously under the
    /// state lock; the side effects run in the background.
    pub fn on_navigation(&self, request: &NavigationRequest) -> Decision {
        let outcome = self.mutate(|core| {
            let super::Core {
                registry,
                tracker,
                router,
                ..
            } = core;
            router.route(request, registry, tracker)
        });

        debug!(
            tab = ?request.tab,
            url = %request.url,
            verdict = ?outcome.verdict,
            effects = outcome.effects.len(),
            "navigation routed"
        );

        let pending = if outcome.effects.is_empty() {
            Pending::none()
        } else {
            let engine = self.clone();
            Pending::spawn(async move { engine.apply_effects(outcome.effects).await })
        };
        Decision {
            verdict: outcome.verdict,
            pending,
        }
    }

    /// Effects of one decision run in order; a failure abandons only itself.
    pub(crate) async fn apply_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let label = effect_name(&effect);
            if let Err(e) = self.apply_effect(effect).await {
                warn!(effect = label, error = %e, "routing effect failed");
            }
        }
    }

    async fn apply_effect(&self, effect: Effect) -> Result<(), TaskbarError> {
        let host = &self.inner.host;
        match effect {
            Effect::Reissue { tab, url, after } => {
                tokio::time::sleep(after).await;
                host.navigate_tab(tab, &url).await?;
            }
            Effect::EnsureSiteWindow { window, site } => {
                self.bind_site_window(window, &site).await;
            }
            Effect::OpenWindow { url } => {
                host.create_window(WindowTarget::Url(url)).await?;
            }
            Effect::OpenWindowFor { url, site, source } => {
                let window = match host.create_window(WindowTarget::Url(url)).await {
                    Ok(window) => window,
                    Err(e) => {
                        self.mutate(|core| core.tracker.clear_intent(source));
                        return Err(e.into());
                    }
                };
                self.mutate(|core| {
                    core.tracker.bind_window_to_site(window, site.clone());
                    core.tracker.clear_intent(source);
                });
                if let Some(site) = site {
                    self.bind_site_window(window, &site).await;
                }
            }
            Effect::MoveTabToNewWindow { tab } => {
                // Attach reconciliation classifies the new window.
                if let Err(e) = host.create_window(WindowTarget::Tab(tab)).await {
                    self.mutate(|core| core.tracker.clear_intent(tab));
                    return Err(e.into());
                }
            }
            Effect::MoveTab { tab, window } => {
                // The intent is already recorded, so only the move itself
                // may abandon it.
                if let Err(e) = host.focus_window(window).await {
                    warn!(window = %window, error = %e, "failed to focus window");
                }
                if let Err(e) = host.move_tab(tab, window).await {
                    self.mutate(|core| core.tracker.clear_intent(tab));
                    return Err(e.into());
                }
            }
            Effect::NavigateActiveTab { window, url } => {
                host.focus_window(window).await?;
                let active = host.query_active_tab(window).await?;
                host.navigate_tab(active.id, &url).await?;
            }
            Effect::OpenTab { window, url } => {
                host.focus_window(window).await?;
                host.create_tab(window, &url).await?;
            }
            Effect::DisposeTab { tab } => self.dispose_tab(tab).await?,
        }
        Ok(())
    }

    /// Close `tab` if it was never really used: still flagged new, or still
    /// showing the blank placeholder.
    pub(crate) async fn dispose_tab(&self, tab: TabId) -> Result<(), TaskbarError> {
        let host = &self.inner.host;
        let unused = self.read(|core| {
            core.tracker
                .tab(tab)
                .is_some_and(|record| record.is_new || record.blank)
        });
        if unused {
            debug!(tab = %tab, "closing unused tab");
            host.close_tab(tab).await?;
            return Ok(());
        }
        let snapshot = host.get_tab(tab).await?;
        if snapshot.url.as_deref() == Some(BLANK_PAGE) {
            debug!(tab = %tab, "closing blank tab");
            host.close_tab(tab).await?;
        }
        Ok(())
    }
}

fn effect_name(effect: &Effect) -> &'static str {
    match effect {
        Effect::Reissue { .. } => "reissue",
        Effect::EnsureSiteWindow { .. } => "ensure_site_window",
        Effect::OpenWindow { .. } => "open_window",
        Effect::OpenWindowFor { .. } => "open_window_for",
        Effect::MoveTabToNewWindow { .. } => "move_tab_to_new_window",
        Effect::MoveTab { .. } => "move_tab",
        Effect::NavigateActiveTab { .. } => "navigate_active_tab",
        Effect::OpenTab { .. } => "open_tab",
        Effect::DisposeTab { .. } => "dispose_tab",
    }
}
