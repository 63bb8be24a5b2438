use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, anyhow};

use crate::backend::Backend;
use crate::client::stub::DEFAULT_STUB_DELAY;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";
pub const ENDPOINT_ENV: &str = "TRAVELCHAT_ENDPOINT";
pub const BACKEND_ENV: &str = "TRAVELCHAT_BACKEND";

/// On-disk settings. Every field is optional; unset fields fall back to the
/// built-in defaults in [`Settings`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub backend: Option<String>,
    pub endpoint: Option<String>,
    pub stub_delay_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

/// Config after defaults and environment overrides are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend: Backend,
    pub endpoint: String,
    pub stub_delay: Duration,
    pub request_timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: Backend::Http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            stub_delay: DEFAULT_STUB_DELAY,
            request_timeout: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            backend: Some(Backend::Http.as_str().to_string()),
            endpoint: None,
            stub_delay_ms: None,
            request_timeout_secs: None,
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    /// Resolve against the process environment
    pub fn settings(&self) -> Settings {
        self.settings_with_env(|key| std::env::var(key).ok())
    }

    /// Resolve with environment lookups going through `env`. Environment
    /// values win over the file, which wins over defaults.
    pub fn settings_with_env<F>(&self, env: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let backend = env(BACKEND_ENV)
            .or_else(|| self.backend.clone())
            .and_then(|b| {
                let parsed = Backend::from_str(&b);
                if parsed.is_none() {
                    tracing::warn!(backend = %b, "unknown backend in config, using default");
                }
                parsed
            })
            .unwrap_or(defaults.backend);

        let endpoint = env(ENDPOINT_ENV)
            .filter(|e| !e.trim().is_empty())
            .or_else(|| self.endpoint.clone())
            .unwrap_or(defaults.endpoint);

        Settings {
            backend,
            endpoint,
            stub_delay: self
                .stub_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.stub_delay),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("travelchat").join("config.json"))
    }
}
