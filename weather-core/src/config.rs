use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{
    client::{ClientConfig, DEFAULT_BASE_URL},
    model::LocationQuery,
};

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// api_key = "..."
/// default_location = "London,UK"
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Visual Crossing API key.
    pub api_key: Option<String>,

    /// Location fetched on start-up.
    pub default_location: Option<String>,

    /// Override for the timeline endpoint, mostly for testing.
    pub base_url: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    /// Store a default location; blank input clears it.
    pub fn set_default_location(&mut self, location: &str) {
        self.default_location = LocationQuery::parse(location).map(|l| l.as_str().to_string());
    }

    /// Configured default location, or London.
    pub fn default_location(&self) -> LocationQuery {
        self.default_location
            .as_deref()
            .and_then(LocationQuery::parse)
            .unwrap_or_else(LocationQuery::default_location)
    }

    /// API key from the environment, falling back to the config file.
    pub fn api_key(&self) -> Result<String> {
        self.api_key_with_env(std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_with_env(&self, env_value: Option<String>) -> Result<String> {
        env_value
            .into_iter()
            .chain(self.api_key.clone())
            .map(|k| k.trim().to_string())
            .find(|k| !k.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: set {API_KEY_ENV} or run `weather configure` and enter your API key."
                )
            })
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        Ok(ClientConfig {
            base_url: self.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: self.api_key()?,
        })
    }
}
