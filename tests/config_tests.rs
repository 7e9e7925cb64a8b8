// Integration tests for configuration loading and validation

use hayalet_dashboard::config::{API_URL_ENV, DEFAULT_BASE_URL};
use hayalet_dashboard::{Config, ConfigError, DashboardError, Locale};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

#[test]
#[serial]
fn test_example_config_parses_to_defaults() {
    std::env::remove_var(API_URL_ENV);
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, include_str!("../config.toml.example")).unwrap();

    let config = Config::from_file(&path).expect("example config loads");
    assert_eq!(config, Config::default());
}

#[test]
#[serial]
fn test_config_save_and_reload() {
    std::env::remove_var(API_URL_ENV);
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");

    let mut config = Config::default();
    config.api.base_url = "http://engine.local:9000".to_string();
    config.sync.poll_interval_ms = 2_500;
    config.display.locale = Locale::En;
    config.to_file(&path).expect("Failed to save config");

    let loaded = Config::from_file(&path).expect("Failed to load config");
    assert_eq!(loaded, config);
    assert_eq!(loaded.push_url(), "ws://engine.local:9000/ws");
}

#[test]
fn test_missing_file_is_not_found() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("absent.toml");

    let err = Config::from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));

    let err = DashboardError::from(err);
    assert_eq!(err.category(), "config");
    assert!(err.user_message().contains("hayalet-dash init"));
}

#[test]
#[serial]
fn test_load_or_default_without_file() {
    std::env::remove_var(API_URL_ENV);
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("absent.toml");

    let config = Config::load_or_default(&path).expect("defaults");
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert!(!path.exists());
}

#[test]
#[serial]
fn test_load_or_create_writes_file() {
    std::env::remove_var(API_URL_ENV);
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("new.toml");

    let config = Config::load_or_create(&path).expect("created");
    assert!(path.exists());
    assert_eq!(Config::from_file(&path).unwrap(), config);
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("broken.toml");
    fs::write(&path, "[sync\npoll_interval_ms = ").unwrap();

    assert!(matches!(Config::from_file(&path), Err(ConfigError::Parse(_))));
}

#[test]
#[serial]
fn test_zero_interval_fails_validation() {
    std::env::remove_var(API_URL_ENV);
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("zero.toml");
    fs::write(&path, "[sync]\nreconnect_delay_ms = 0\n").unwrap();

    assert!(matches!(Config::from_file(&path), Err(ConfigError::Validation(_))));
}

#[test]
#[serial]
fn test_env_overrides_base_url() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    Config::default().to_file(&path).unwrap();

    std::env::set_var(API_URL_ENV, "https://engine.example");
    let config = Config::from_file(&path);
    std::env::remove_var(API_URL_ENV);

    let config = config.expect("config with override");
    assert_eq!(config.api.base_url, "https://engine.example");
    assert_eq!(config.push_url(), "wss://engine.example/ws");
    assert_eq!(config.status_url(), "https://engine.example/api/status");
}

#[test]
#[serial]
fn test_invalid_env_url_fails_validation() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    Config::default().to_file(&path).unwrap();

    std::env::set_var(API_URL_ENV, "engine:8090");
    let result = Config::from_file(&path);
    std::env::remove_var(API_URL_ENV);

    assert!(matches!(result, Err(ConfigError::Validation(_))));
}
