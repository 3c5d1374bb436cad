//! Window/Tab State Tracker.
//!
//! A pure in-memory state container. It never calls the host; the engine
//! feeds it host events and reads it while routing.

mod tabs;
mod types;
mod windows;

pub use types::*;

use std::collections::HashMap;

use taskbar_common::{TabId, WindowId};

/// Owns every [`WindowRecord`] and [`TabRecord`].
#[derive(Debug, Default)]
pub struct Tracker {
    /// Window records by host handle.
    pub(super) windows: HashMap<WindowId, WindowRecord>,
    /// Window ids, most recently focused first.
    pub(super) recency: Vec<WindowId>,
    /// Tab records by host handle.
    pub(super) tabs: HashMap<TabId, TabRecord>,
    /// Set once persisted state has been loaded and existing windows adopted.
    pub(super) ready: bool,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn mark_ready(&mut self) {
        self.ready = true;
    }
}
