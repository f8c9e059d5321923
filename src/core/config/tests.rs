use super::data::{Config, Overrides};
use super::defaults::{ConfigKeyError, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::core::persona::Persona;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config
        .set_value("base-url", "http://127.0.0.1:8080/")
        .expect("base-url accepted");
    config
        .set_value("default-persona", "Teacher")
        .expect("persona accepted");
    config
        .set_value("poll-interval", "5")
        .expect("interval accepted");
    config.save_to_path(&config_path).expect("save failed");

    let loaded = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(loaded.base_url.as_deref(), Some("http://127.0.0.1:8080"));
    assert_eq!(loaded.default_persona, Some(Persona::Teacher));
    assert_eq!(loaded.poll_interval_secs, Some(5));

    let mut loaded = loaded;
    loaded.unset_value("default-persona").expect("unset works");
    loaded.save_to_path(&config_path).expect("second save failed");

    let reloaded = Config::load_from_path(&config_path).expect("reload failed");
    assert_eq!(reloaded.default_persona, None);
    assert_eq!(reloaded.base_url.as_deref(), Some("http://127.0.0.1:8080"));
}

#[test]
fn invalid_toml_reports_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "base_url = [").expect("write config");

    let err = Config::load_from_path(&config_path).expect_err("parse should fail");
    assert!(err.to_string().starts_with("Failed to parse config"));
}

#[test]
fn defaults_apply_when_nothing_is_set() {
    let settings = Config::default().resolve(None, &Overrides::default());

    assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    assert_eq!(settings.model, DEFAULT_MODEL);
    assert!((settings.temperature - 0.7).abs() < f32::EPSILON);
    assert_eq!(settings.poll_interval, Duration::from_secs(30));
    assert_eq!(settings.persona, Persona::Assistant);
}

#[test]
fn overrides_take_precedence_over_env_and_file() {
    let config = Config {
        base_url: Some("http://file:1".to_string()),
        model: Some("file-model".to_string()),
        default_persona: Some(Persona::Writer),
        ..Default::default()
    };

    let from_env = config.resolve(Some("http://env:2".to_string()), &Overrides::default());
    assert_eq!(from_env.base_url, "http://env:2");
    assert_eq!(from_env.model, "file-model");
    assert_eq!(from_env.persona, Persona::Writer);

    let overrides = Overrides {
        base_url: Some("http://cli:3".to_string()),
        model: Some("cli-model".to_string()),
        persona: Some(Persona::Concise),
    };
    let from_cli = config.resolve(Some("http://env:2".to_string()), &overrides);
    assert_eq!(from_cli.base_url, "http://cli:3");
    assert_eq!(from_cli.model, "cli-model");
    assert_eq!(from_cli.persona, Persona::Concise);
}

#[test]
fn zero_poll_interval_falls_back_to_default() {
    let config = Config {
        poll_interval_secs: Some(0),
        ..Default::default()
    };
    let settings = config.resolve(None, &Overrides::default());
    assert_eq!(settings.poll_interval, Duration::from_secs(30));
}

#[test]
fn set_value_rejects_bad_input() {
    let mut config = Config::default();

    assert_eq!(
        config.set_value("colour", "blue"),
        Err(ConfigKeyError::UnknownKey("colour".to_string()))
    );
    assert!(matches!(
        config.set_value("temperature", "hot"),
        Err(ConfigKeyError::InvalidValue { .. })
    ));
    assert!(matches!(
        config.set_value("temperature", "3.5"),
        Err(ConfigKeyError::InvalidValue { .. })
    ));
    assert!(matches!(
        config.set_value("poll-interval", "0"),
        Err(ConfigKeyError::InvalidValue { .. })
    ));
    assert!(matches!(
        config.set_value("default-persona", "pirate"),
        Err(ConfigKeyError::InvalidValue { .. })
    ));
    assert_eq!(config, Config::default());
}

#[test]
fn persona_is_stored_by_id() {
    let config = Config {
        default_persona: Some(Persona::Programmer),
        ..Default::default()
    };
    let text = toml::to_string_pretty(&config).expect("serializes");
    assert!(text.contains("default_persona = \"programmer\""));
}
