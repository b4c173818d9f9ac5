use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};

use crate::client::ClientId;
use crate::error::ConfigError;

/// Configuration for a single upstream client (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Example TOML:
    /// [clients.openweather]
    /// api_key = "..."
    pub clients: HashMap<String, ClientConfig>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
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

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "pollenwatch", "pollenwatch-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set or replace the API key stored for a client.
    pub fn upsert_client_api_key(&mut self, client_id: ClientId, api_key: String) {
        self.clients
            .insert(client_id.as_str().to_string(), ClientConfig { api_key });
    }

    /// Returns the stored API key for a client, if present.
    pub fn client_api_key(&self, client_id: ClientId) -> Option<&str> {
        self.clients
            .get(client_id.as_str())
            .map(|cfg| cfg.api_key.as_str())
    }

    pub fn is_client_configured(&self, client_id: ClientId) -> bool {
        self.client_api_key(client_id).is_some()
    }
}

/// Resolve the key a client is constructed with: the explicit
/// parameter wins, then the client's environment variable. Absence of
/// both is fatal at construction time, not deferred to first use.
pub fn resolve_api_key(
    explicit: Option<String>,
    client_id: ClientId,
) -> Result<String, ConfigError> {
    if let Some(key) = explicit.filter(|k| !k.trim().is_empty()) {
        return Ok(key);
    }

    std::env::var(client_id.env_var())
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or(ConfigError::MissingApiKey {
            client: client_id,
            env_var: client_id.env_var(),
        })
}
