//! `set` / `unset` handlers for configuration keys.

use std::error::Error;
use std::fmt;

use crate::core::budget::MIN_MAX_TOKENS;
use crate::core::config::Config;
use crate::core::models::ModelRegistry;

const KNOWN_KEYS: &[&str] = &["default-model", "max-tokens", "emotion", "base-url"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    UnknownKey(String),
    InvalidValue { key: &'static str, reason: String },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::UnknownKey(key) => write!(
                f,
                "Unknown config key: {key} (expected one of: {})",
                KNOWN_KEYS.join(", ")
            ),
            SettingsError::InvalidValue { key, reason } => {
                write!(f, "Invalid value for {key}: {reason}")
            }
        }
    }
}

impl Error for SettingsError {}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(SettingsError::InvalidValue {
            key,
            reason: format!("'{other}' is not a boolean"),
        }),
    }
}

pub fn set_value(config: &mut Config, key: &str, value: &str) -> Result<String, SettingsError> {
    let value = value.trim();
    match key {
        "default-model" => {
            let registry = ModelRegistry::builtin();
            let model = registry
                .get(value)
                .map_err(|err| SettingsError::InvalidValue {
                    key: "default-model",
                    reason: err.to_string(),
                })?;
            config.default_model = Some(model.id.clone());
            Ok(format!("Set default-model to: {}", model.id))
        }
        "max-tokens" => {
            let tokens = value
                .parse::<u32>()
                .ok()
                .filter(|tokens| *tokens >= MIN_MAX_TOKENS)
                .ok_or_else(|| SettingsError::InvalidValue {
                    key: "max-tokens",
                    reason: format!("expected a whole number of at least {MIN_MAX_TOKENS}"),
                })?;
            config.max_tokens = Some(tokens);
            Ok(format!("Set max-tokens to: {tokens}"))
        }
        "emotion" => {
            let enabled = parse_bool("emotion", value)?;
            config.emotion = Some(enabled);
            Ok(format!("Set emotion to: {enabled}"))
        }
        "base-url" => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(SettingsError::InvalidValue {
                    key: "base-url",
                    reason: "expected an http:// or https:// URL".to_string(),
                });
            }
            config.base_url = Some(value.trim_end_matches('/').to_string());
            Ok(format!("Set base-url to: {value}"))
        }
        other => Err(SettingsError::UnknownKey(other.to_string())),
    }
}

pub fn unset_value(config: &mut Config, key: &str) -> Result<String, SettingsError> {
    match key {
        "default-model" => config.default_model = None,
        "max-tokens" => config.max_tokens = None,
        "emotion" => config.emotion = None,
        "base-url" => config.base_url = None,
        other => return Err(SettingsError::UnknownKey(other.to_string())),
    }
    Ok(format!("Unset {key}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_must_exist() {
        let mut config = Config::default();
        assert!(set_value(&mut config, "default-model", "llama3-70b-8192").is_ok());
        assert_eq!(config.default_model.as_deref(), Some("llama3-70b-8192"));

        let err = set_value(&mut config, "default-model", "gpt-4o").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { key: "default-model", .. }));
        assert_eq!(config.default_model.as_deref(), Some("llama3-70b-8192"));
    }

    #[test]
    fn max_tokens_needs_minimum() {
        let mut config = Config::default();
        assert!(set_value(&mut config, "max-tokens", "256").is_err());
        assert!(set_value(&mut config, "max-tokens", "many").is_err());
        assert_eq!(
            set_value(&mut config, "max-tokens", "4096"),
            Ok("Set max-tokens to: 4096".to_string())
        );
        assert_eq!(config.max_tokens, Some(4096));
    }

    #[test]
    fn emotion_accepts_common_booleans() {
        let mut config = Config::default();
        set_value(&mut config, "emotion", "off").unwrap();
        assert_eq!(config.emotion, Some(false));
        set_value(&mut config, "emotion", "Yes").unwrap();
        assert_eq!(config.emotion, Some(true));
        assert!(set_value(&mut config, "emotion", "maybe").is_err());
    }

    #[test]
    fn base_url_is_normalized() {
        let mut config = Config::default();
        set_value(&mut config, "base-url", "http://localhost:8080/v1/").unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/v1"));
        assert!(set_value(&mut config, "base-url", "localhost").is_err());
    }

    #[test]
    fn unset_clears_and_rejects_unknown_keys() {
        let mut config = Config {
            max_tokens: Some(1024),
            ..Default::default()
        };
        unset_value(&mut config, "max-tokens").unwrap();
        assert_eq!(config.max_tokens, None);
        assert_eq!(
            unset_value(&mut config, "theme"),
            Err(SettingsError::UnknownKey("theme".to_string()))
        );
    }
}
