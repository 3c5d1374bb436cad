//! State access and condition waits.

use std::sync::MutexGuard;
use std::time::Duration;

use super::{Core, Engine};

impl Engine {
    fn lock(&self) -> MutexGuard<'_, Core> {
        self.inner.core.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&Core) -> R) -> R {
        f(&self.lock())
    }

    /// Run `f` against the state and wake every waiter.
    pub(crate) fn mutate<R>(&self, f: impl FnOnce(&mut Core) -> R) -> R {
        let result = f(&mut self.lock());
        self.inner.revision.send_modify(|revision| *revision += 1);
        result
    }

    /// Wait until `condition` holds, re-checking after every mutation.
    /// Returns `false` if it still doesn't hold after `timeout`.
    pub async fn wait_until<F>(&self, timeout: Duration, condition: F) -> bool
    where
        F: Fn(&Core) -> bool + Send + Sync,
    {
        // Subscribe before the first check so no transition is missed.
        let mut changes = self.inner.revision.subscribe();
        let settled = async {
            loop {
                if self.read(&condition) {
                    return;
                }
                if changes.changed().await.is_err() {
                    std::future::pending::<()>().await;
                }
            }
        };
        tokio::time::timeout(timeout, settled).await.is_ok()
    }
}
