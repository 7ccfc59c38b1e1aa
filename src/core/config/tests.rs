use super::data::{path_display, Config};
use super::io::ConfigError;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert!(config.emotion_enabled());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config {
        default_model: Some("llama3-70b-8192".to_string()),
        max_tokens: Some(2048),
        emotion: Some(false),
        base_url: None,
    };
    config.save_to_path(&config_path).expect("Failed to save config");

    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded, config);
    assert!(!loaded.emotion_enabled());

    config.default_model = None;
    config.save_to_path(&config_path).expect("Failed to save config");
    let reloaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(reloaded.default_model, None);
    assert_eq!(reloaded.max_tokens, Some(2048));
}

#[test]
fn test_saved_file_is_plain_toml() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");

    Config {
        default_model: Some("gemma-7b-it".to_string()),
        ..Default::default()
    }
    .save_to_path(&config_path)
    .expect("Failed to save config");

    let contents = std::fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("default_model = \"gemma-7b-it\""));
}

#[test]
fn test_invalid_toml_reports_parse_error_with_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "max_tokens = \"lots\"").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Failed to parse config at"));
}

#[cfg(unix)]
#[test]
fn test_path_display_uses_home_shorthand() {
    if let Some(home) = std::env::var_os("HOME") {
        let path = std::path::PathBuf::from(home).join(".config/vers3chat/config.toml");
        assert_eq!(path_display(&path), "~/.config/vers3chat/config.toml");
    }
    assert_eq!(path_display("/etc/vers3chat.toml"), "/etc/vers3chat.toml");
}
