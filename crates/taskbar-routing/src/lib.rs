//! URL-to-window routing for taskbar site windows.
//!
//! Decides which top-level window, and which installed site, each navigation
//! belongs to, and drives the host to put it there.

pub mod engine;
pub mod host;
pub mod registry;
pub mod router;
pub mod scope;
pub mod site;
pub mod store;
pub mod tracker;

pub use engine::{Core, Decision, Engine, ManagementRequest, ManagementResponse, Pending, SiteChange};
pub use host::{BrowserHost, ShortcutSpec, WindowChrome, WindowTarget};
pub use registry::SiteRegistry;
pub use router::{Effect, NavigationRequest, RouteOutcome, Router, RoutingPolicy, Verdict};
pub use scope::{MatchOptions, Scope};
pub use site::{Site, SitePatch};
pub use store::{JsonFileStore, MemoryStore, PersistedState, Store};
pub use tracker::{TabRecord, Tracker, WindowRecord};
