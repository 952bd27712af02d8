use std::{fs, path::PathBuf};

use pocketwise_config::{Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_has_non_empty_fields() {
    let cfg = Config::default();

    assert_eq!(cfg.currency, "USD");
    assert_eq!(cfg.locale, "en-US");
    assert!(cfg.ui_color_enabled);
    assert!(cfg.date_format.is_none());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let cfg = Config {
        currency: "EUR".to_string(),
        locale: "de-DE".to_string(),
        date_format: Some("%d.%m.%Y".to_string()),
        ui_color_enabled: false,
        data_dir: Some(dir.path().join("ledger")),
    };

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    assert_eq!(manager.config_path(), dir.path().join("config").join("config.json"));
    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "currency": "GBP" }"#).expect("seed");

    let loaded = ConfigManager::new(path).load().expect("load");
    assert_eq!(loaded.currency, "GBP");
    assert_eq!(loaded.locale, "en-US");
    assert!(loaded.ui_color_enabled);
}

#[test]
fn malformed_file_is_reported() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, "{ nope").expect("seed");

    let err = ConfigManager::new(path).load().unwrap_err();
    assert!(matches!(err, ConfigError::Serde(_)));
}

#[test]
fn data_dir_prefers_home_then_override() {
    let home = PathBuf::from("/tmp/pw-home");
    let custom = PathBuf::from("/tmp/pw-data");
    let cfg = Config {
        data_dir: Some(custom.clone()),
        ..Config::default()
    };

    assert_eq!(cfg.resolve_data_dir(Some(home.as_path())), home);
    assert_eq!(cfg.resolve_data_dir(None), custom);
    assert!(Config::default()
        .resolve_data_dir(None)
        .ends_with("pocketwise"));
}
