//! Taskbar tabs configuration system.
//!
//! Provides TOML-based configuration with full validation. All sections use
//! sensible defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use taskbar_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    ChromeConfig, LogLevel, LoggingConfig, RoutingConfig, Settings, StorageConfig, TaskbarConfig,
};

use std::path::Path;

use taskbar_common::ConfigError;

/// Load config from `path`, or from the platform default path when `None`.
///
/// The default file is created from the commented template if it is missing.
/// The result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<TaskbarConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &TaskbarConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
