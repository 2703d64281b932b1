use planetvote::config::{AppConfig, ENV_API_BASE_URL, ENV_RELAY_ENABLED, ENV_WS_URL};
use planetvote::error::ConfigError;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults() {
    let config = AppConfig::default();

    assert_eq!(config.vote.combo_window_ms, 2_000);
    assert_eq!(config.vote.combo_reset(), Duration::from_millis(3_000));
    assert_eq!(config.vote.flush_delay(), Duration::from_millis(100));
    assert_eq!(config.api.base_url, "http://localhost:3000/api");
    assert_eq!(config.relay.reconnect_delay(), Duration::from_secs(5));
    assert!(config.relay.enabled);
    assert_eq!(config.display.refresh_interval(), Duration::from_secs(30));
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let file = write_config(
        r#"
[vote]
flush_delay_ms = 250

[relay]
enabled = false
"#,
    );

    let config = AppConfig::from_file(file.path()).unwrap();
    assert_eq!(config.vote.flush_delay_ms, 250);
    assert_eq!(config.vote.combo_window_ms, 2_000);
    assert!(!config.relay.enabled);
    assert_eq!(config.relay.ws_url, "ws://localhost:3000/ws");
}

#[test]
fn test_load_validates_file() {
    let file = write_config(
        r#"
[vote]
combo_window_ms = 3000
combo_reset_ms = 3000
"#,
    );

    match AppConfig::load(Some(file.path())) {
        Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, "vote.combo_window_ms"),
        other => panic!("Expected invalid window, got {:?}", other),
    }
}

#[test]
fn test_zero_durations_rejected() {
    let mut config = AppConfig::default();
    config.vote.flush_delay_ms = 0;

    match config.validate() {
        Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, "vote.flush_delay_ms"),
        other => panic!("Expected invalid flush delay, got {:?}", other),
    }
}

#[test]
fn test_display_refresh_from_file() {
    let file = write_config("[display]\nrefresh_ms = 0\n");

    let config = AppConfig::from_file(file.path()).unwrap();
    assert_eq!(config.display.refresh_ms, 0);
    match config.validate() {
        Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, "display.refresh_ms"),
        other => panic!("Expected invalid refresh, got {:?}", other),
    }
}

#[test]
fn test_bad_toml_is_parse_error() {
    let file = write_config("[vote\ncombo_window_ms = ");
    assert!(matches!(AppConfig::from_file(file.path()), Err(ConfigError::Parse(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(matches!(AppConfig::from_file(&missing), Err(ConfigError::Io(_))));
}

#[test]
fn test_environment_overrides() {
    std::env::set_var(ENV_API_BASE_URL, "https://vote.example.com/api");
    std::env::set_var(ENV_WS_URL, "wss://vote.example.com/ws");
    std::env::set_var(ENV_RELAY_ENABLED, "off");

    let mut config = AppConfig::default();
    config.apply_env();

    std::env::remove_var(ENV_API_BASE_URL);
    std::env::remove_var(ENV_WS_URL);
    std::env::remove_var(ENV_RELAY_ENABLED);

    assert_eq!(config.api.base_url, "https://vote.example.com/api");
    assert_eq!(config.relay.ws_url, "wss://vote.example.com/ws");
    assert!(!config.relay.enabled);
}
