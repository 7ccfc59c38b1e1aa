//! API key and endpoint resolution.
//!
//! The key is read once at startup: `GROQ_API_KEY` first, then the system
//! keyring. A missing key is not an error here; the first completion request
//! reports it as an authentication failure.

use keyring::Entry;
use tracing::{debug, warn};

use crate::core::chat_stream::DEFAULT_BASE_URL;
use crate::core::config::Config;
use crate::core::keyring::KeyringAccessError;

pub const API_KEY_ENV: &str = "GROQ_API_KEY";
pub const BASE_URL_ENV: &str = "GROQ_BASE_URL";

const KEYRING_SERVICE: &str = "vers3chat";
const KEYRING_USER: &str = "groq";

fn entry() -> Result<Entry, KeyringAccessError> {
    Entry::new(KEYRING_SERVICE, KEYRING_USER).map_err(KeyringAccessError::from)
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn read_keyring_key() -> Result<Option<String>, KeyringAccessError> {
    match entry()?.get_password() {
        Ok(key) => Ok(non_empty(key)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub fn store_api_key(key: &str) -> Result<(), KeyringAccessError> {
    entry()?.set_password(key.trim())?;
    Ok(())
}

/// Removes the stored key. Returns whether one was present.
pub fn delete_api_key() -> Result<bool, KeyringAccessError> {
    match entry()?.delete_credential() {
        Ok(()) => Ok(true),
        Err(keyring::Error::NoEntry) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// Resolves the API key from the environment or, unless `env_only`, the
/// keyring. Recoverable keyring outages count as "no key".
pub fn resolve_api_key(env_only: bool) -> Result<Option<String>, KeyringAccessError> {
    if let Some(key) = std::env::var(API_KEY_ENV).ok().and_then(non_empty) {
        debug!("using API key from {API_KEY_ENV}");
        return Ok(Some(key));
    }
    if env_only {
        return Ok(None);
    }

    match read_keyring_key() {
        Ok(key) => Ok(key),
        Err(err) if err.is_recoverable() => {
            warn!(error = %err, "keyring unavailable; continuing without stored key");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Endpoint precedence: `GROQ_BASE_URL`, then the config file, then Groq.
pub fn resolve_base_url(config: &Config) -> String {
    std::env::var(BASE_URL_ENV)
        .ok()
        .and_then(non_empty)
        .or_else(|| config.base_url.clone().and_then(non_empty))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_ignored() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty(" gsk-1 ".to_string()), Some("gsk-1".to_string()));
    }

    #[test]
    fn config_base_url_applies_without_env_override() {
        if std::env::var_os(BASE_URL_ENV).is_some() {
            return;
        }
        let config = Config {
            base_url: Some("http://localhost:8080/v1".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_base_url(&config), "http://localhost:8080/v1");
        assert_eq!(resolve_base_url(&Config::default()), DEFAULT_BASE_URL);
    }
}
