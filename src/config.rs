use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RelayConfig {
    pub server: ServerConfig,
    pub hub: HubConfig,
    pub model: ModelConfig,
    pub storage: StorageConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HubConfig {
    pub url: String,
    pub token: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelConfig {
    pub provider: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub memory_path: String,
}

/// Settings used by the `chat` and `ask` commands to reach a running relay.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            log_level: "info".into(),
        }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            url: "http://homeassistant.local:8123".into(),
            token: String::new(),
            timeout_secs: 5,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "openai".into(),
            base_url: "http://localhost:8080/v1".into(),
            model: "qwen2.5-3b-instruct".into(),
            max_tokens: 256,
            timeout_secs: 120,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let memory_path = default_relay_dir()
            .join("memory.json")
            .to_string_lossy()
            .into_owned();
        Self { memory_path }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".into(),
            timeout_secs: 300,
        }
    }
}

/// Returns `~/.homerelay/`, or `./.homerelay/` when no home directory is known.
pub fn default_relay_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".homerelay")
}

/// Returns the default config file path: `~/.homerelay/config.toml`
pub fn default_config_path() -> PathBuf {
    default_relay_dir().join("config.toml")
}

impl RelayConfig {
    /// Load config from the default TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            RelayConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// `HA_URL` and `HA_TOKEN` keep the names used by existing `home.env` files.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HA_URL") {
            self.hub.url = val;
        }
        if let Ok(val) = std::env::var("HA_TOKEN") {
            self.hub.token = val;
        }
        if let Ok(val) = std::env::var("HOMERELAY_MEMORY") {
            self.storage.memory_path = val;
        }
        if let Ok(val) = std::env::var("HOMERELAY_MODEL_URL") {
            self.model.base_url = val;
        }
        if let Ok(val) = std::env::var("HOMERELAY_SERVER_URL") {
            self.client.server_url = val;
        }
        if let Ok(val) = std::env::var("HOMERELAY_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the memory file path, expanding `~` if needed.
    pub fn resolved_memory_path(&self) -> PathBuf {
        expand_tilde(&self.storage.memory_path)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
