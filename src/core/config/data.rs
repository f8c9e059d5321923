use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::persona::Persona;

use super::defaults::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_TEMPERATURE,
};

/// Values persisted in `config.toml`. Unset keys fall back to the documented defaults.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Inference server root, without the `/v1` suffix
    pub base_url: Option<String>,
    /// Model name sent with every completion request
    pub model: Option<String>,
    /// Sampling temperature sent with every completion request
    pub temperature: Option<f32>,
    /// Seconds between connection probes
    pub poll_interval_secs: Option<u64>,
    /// Persona selected when a chat starts
    pub default_persona: Option<Persona>,
}

/// Per-invocation overrides layered on top of the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub persona: Option<Persona>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub poll_interval: Duration,
    pub persona: Persona,
}

impl Default for Settings {
    fn default() -> Self {
        Config::default().resolve(None, &Overrides::default())
    }
}

impl Config {
    /// Resolve settings with precedence: CLI overrides, then environment, then file, then defaults.
    pub fn resolve(&self, env_base_url: Option<String>, overrides: &Overrides) -> Settings {
        let base_url = overrides
            .base_url
            .clone()
            .or(env_base_url)
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = overrides
            .model
            .clone()
            .or_else(|| self.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let poll_secs = self
            .poll_interval_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

        Settings {
            base_url,
            model,
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            poll_interval: Duration::from_secs(poll_secs),
            persona: overrides
                .persona
                .or(self.default_persona)
                .unwrap_or_default(),
        }
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
