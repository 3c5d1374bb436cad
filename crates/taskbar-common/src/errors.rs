use std::path::PathBuf;

use crate::id::{SiteId, TabId, WindowId};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures reported by the browser host or the window chrome integration.
///
/// These are transient: the window or tab may have closed between the event
/// that triggered a call and the call itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("window not found: {0}")]
    WindowNotFound(WindowId),

    #[error("tab not found: {0}")]
    TabNotFound(TabId),

    #[error("host call failed: {0}")]
    CallFailed(String),

    #[error("host disconnected")]
    Disconnected,
}

/// Rejected user input. Raised before any state is mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SiteError {
    #[error("invalid scope '{scope}': {reason}")]
    InvalidScope { scope: String, reason: String },

    #[error("invalid display name: {0:?}")]
    InvalidDisplayName(String),

    #[error("homepage {homepage} is not within scope {scope}")]
    HomepageOutOfScope { homepage: String, scope: String },

    #[error("current page {url} is not within scope {scope}")]
    ScopeExcludesCurrentPage { url: String, scope: String },

    #[error("site already installed: {0}")]
    AlreadyInstalled(SiteId),

    #[error("scope {scope} collides with installed site {existing} ({existing_scope})")]
    IdCollision {
        scope: String,
        existing: SiteId,
        existing_scope: String,
    },

    #[error("site not installed: {0}")]
    NotInstalled(SiteId),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum TaskbarError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Site(#[from] SiteError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
