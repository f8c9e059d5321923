//! Documented defaults and the key vocabulary used by `localchat set`/`unset`.

use std::fmt;

use crate::core::config::data::Config;
use crate::core::persona::Persona;

/// LM Studio's default local server address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:1234";
pub const DEFAULT_MODEL: &str = "local-model";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Environment variable that overrides the configured base URL.
pub const BASE_URL_ENV: &str = "LOCALCHAT_BASE_URL";

pub const CONFIG_KEYS: [&str; 5] = [
    "base-url",
    "model",
    "temperature",
    "poll-interval",
    "default-persona",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigKeyError {
    UnknownKey(String),
    InvalidValue { key: String, reason: String },
}

impl fmt::Display for ConfigKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigKeyError::UnknownKey(key) => write!(
                f,
                "Unknown config key: {key}. Valid keys: {}",
                CONFIG_KEYS.join(", ")
            ),
            ConfigKeyError::InvalidValue { key, reason } => {
                write!(f, "Invalid value for {key}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigKeyError {}

fn invalid(key: &str, reason: impl Into<String>) -> ConfigKeyError {
    ConfigKeyError::InvalidValue {
        key: key.to_string(),
        reason: reason.into(),
    }
}

impl Config {
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigKeyError> {
        let value = value.trim();
        match key {
            "base-url" => {
                if value.is_empty() {
                    return Err(invalid(key, "must not be empty"));
                }
                self.base_url = Some(value.trim_end_matches('/').to_string());
            }
            "model" => {
                if value.is_empty() {
                    return Err(invalid(key, "must not be empty"));
                }
                self.model = Some(value.to_string());
            }
            "temperature" => {
                let parsed: f32 = value
                    .parse()
                    .map_err(|_| invalid(key, format!("'{value}' is not a number")))?;
                if !(0.0..=2.0).contains(&parsed) {
                    return Err(invalid(key, "must be between 0.0 and 2.0"));
                }
                self.temperature = Some(parsed);
            }
            "poll-interval" => {
                let parsed: u64 = value
                    .parse()
                    .map_err(|_| invalid(key, format!("'{value}' is not a whole number")))?;
                if parsed == 0 {
                    return Err(invalid(key, "must be at least 1 second"));
                }
                self.poll_interval_secs = Some(parsed);
            }
            "default-persona" => {
                let persona: Persona = value.parse().map_err(|reason| invalid(key, reason))?;
                self.default_persona = Some(persona);
            }
            _ => return Err(ConfigKeyError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: &str) -> Result<(), ConfigKeyError> {
        match key {
            "base-url" => self.base_url = None,
            "model" => self.model = None,
            "temperature" => self.temperature = None,
            "poll-interval" => self.poll_interval_secs = None,
            "default-persona" => self.default_persona = None,
            _ => return Err(ConfigKeyError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}
