//! Full configuration validation.
//!
//! Checks numeric ranges and string constraints, collecting every problem
//! into a single `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use taskbar_common::ConfigError;

use crate::schema::TaskbarConfig;
use helpers::{validate_non_empty, validate_range};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TaskbarConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_routing(&mut errors, config);
    validate_chrome(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_routing(errors: &mut Vec<String>, config: &TaskbarConfig) {
    let routing = &config.routing;
    validate_range(errors, "routing.retry_delay_ms", routing.retry_delay_ms, 10, 5000);
    validate_range(errors, "routing.max_retries", routing.max_retries as u64, 1, 100);
    validate_range(
        errors,
        "routing.settle_timeout_ms",
        routing.settle_timeout_ms,
        100,
        60_000,
    );
    validate_range(errors, "routing.icon_timeout_ms", routing.icon_timeout_ms, 0, 60_000);
    validate_range(
        errors,
        "routing.site_close_grace_ms",
        routing.site_close_grace_ms,
        0,
        10_000,
    );
    for (i, page) in routing.new_tab_pages.iter().enumerate() {
        validate_non_empty(errors, &format!("routing.new_tab_pages[{i}]"), page);
    }
}

fn validate_chrome(errors: &mut Vec<String>, config: &TaskbarConfig) {
    validate_non_empty(errors, "chrome.group_prefix", &config.chrome.group_prefix);
}
