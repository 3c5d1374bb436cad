use super::*;

#[test]
fn default_config_is_valid() {
    assert!(validate(&TaskbarConfig::default()).is_ok());
}

#[test]
fn out_of_range_retry_settings_rejected() {
    let mut config = TaskbarConfig::default();
    config.routing.retry_delay_ms = 5;
    config.routing.max_retries = 0;

    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("routing.retry_delay_ms = 5 is out of range [10, 5000]"));
    assert!(err.contains("routing.max_retries = 0"));
}

#[test]
fn errors_are_joined() {
    let mut config = TaskbarConfig::default();
    config.routing.settle_timeout_ms = 0;
    config.chrome.group_prefix = "  ".into();

    match validate(&config) {
        Err(ConfigError::ValidationError(msg)) => {
            assert_eq!(msg.split("; ").count(), 2);
            assert!(msg.contains("chrome.group_prefix must not be empty"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn empty_new_tab_page_rejected() {
    let mut config = TaskbarConfig::default();
    config.routing.new_tab_pages.push(String::new());
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("routing.new_tab_pages[5] must not be empty"));
}

#[test]
fn zero_icon_timeout_allowed() {
    let mut config = TaskbarConfig::default();
    config.routing.icon_timeout_ms = 0;
    assert!(validate(&config).is_ok());
}
