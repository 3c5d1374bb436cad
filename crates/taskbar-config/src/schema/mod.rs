//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod chrome;
mod defaults;
mod routing;
mod system;

pub use chrome::*;
pub use defaults::*;
pub use routing::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TaskbarConfig {
    /// Initial process-wide settings for newly installed sites.
    pub defaults: Settings,
    pub routing: RoutingConfig,
    pub chrome: ChromeConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}
