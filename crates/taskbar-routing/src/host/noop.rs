//! No-op WindowChrome implementation.
//!
//! Used on platforms without taskbar grouping or launcher shortcuts, and
//! for testing.

use async_trait::async_trait;
use taskbar_common::{SiteId, WindowId};

use super::{Result, ShortcutSpec, WindowChrome};

/// Accepts every chrome call and does nothing. Nothing is ever pinned.
pub struct NoopChrome;

#[async_trait]
impl WindowChrome for NoopChrome {
    async fn set_group_id(&self, _window: WindowId, _token: &str) -> Result<()> {
        Ok(())
    }

    async fn set_window_icon(&self, _window: WindowId, _icon: &str) -> Result<()> {
        Ok(())
    }

    async fn create_shortcut(&self, _spec: &ShortcutSpec) -> Result<()> {
        Ok(())
    }

    async fn delete_shortcut(
        &self,
        _site: &SiteId,
        _display_name: &str,
        _delete_icon: bool,
    ) -> Result<()> {
        Ok(())
    }

    async fn is_pinned(&self, _token: &str) -> Result<bool> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_chrome_accepts_everything() {
        let chrome = NoopChrome;
        assert!(chrome.set_group_id(WindowId(1), "taskbar-1").await.is_ok());
        assert!(chrome.set_window_icon(WindowId(1), "icon").await.is_ok());
        assert!(!chrome.is_pinned("taskbar-1").await.unwrap());
    }
}
