/*!
common/src/lib.rs

Shared configuration types for newsocial.

This file provides:
- Config data structures (deserialized from TOML)
- An async loader that merges a default file with an optional override file
- Resolution helpers that turn optional sections into concrete settings
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_CLIENT_TIMEOUT_SECS: u64 = 45;

pub const DEFAULT_CONFIG_FILE: &str = "config.default.toml";
pub const OVERRIDE_CONFIG_FILE: &str = "config.toml";

/// Environment variable that overrides the listening port (and the client's default base URL)
pub const PORT_ENV: &str = "NEWS_API_PORT";

/// HTTP listener configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub port: Option<u16>,
}

/// Per-operation model parameters. Any field left out falls back to the
/// operation's built-in profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelProfileConfig {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
}

/// Remote (OpenAI-compatible) model provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Full chat-completions endpoint
    pub api_url: Option<String>,
    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,
    pub timeout_seconds: Option<u64>,
    // Operation-specific overrides
    pub news: Option<ModelProfileConfig>,
    pub social: Option<ModelProfileConfig>,
    pub series: Option<ModelProfileConfig>,
    pub analysis: Option<ModelProfileConfig>,
}

/// Settings used by the terminal client to reach the service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

impl Config {
    /// Load configuration from a TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        Ok(cfg)
    }

    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence).
    /// Missing files are skipped, so with neither present the built-in defaults apply.
    pub async fn load_with_defaults(default_path: Option<&Path>, override_path: Option<&Path>) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        if let Some(path) = default_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path).await
                    .with_context(|| format!("Failed to read default config: {}", path.display()))?;
                let val: toml::Value = toml::from_str(&data)
                    .context("Failed to parse default configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        if let Some(path) = override_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path).await
                    .with_context(|| format!("Failed to read override config: {}", path.display()))?;
                let val: toml::Value = toml::from_str(&data)
                    .context("Failed to parse override configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        let cfg: Config = config_value.try_into().context("Failed to parse merged configuration")?;
        Ok(cfg)
    }

    /// Load `config.default.toml` and then `config.toml` from `dir`, or an
    /// explicit override file instead of `config.toml`. An explicit file
    /// must exist; the conventional ones are optional.
    pub async fn load_layered(dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let default_path = dir.join(DEFAULT_CONFIG_FILE);
        let override_path = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                path.to_path_buf()
            }
            None => dir.join(OVERRIDE_CONFIG_FILE),
        };
        Self::load_with_defaults(Some(default_path.as_path()), Some(override_path.as_path())).await
    }

    /// Port to listen on: `NEWS_API_PORT` wins over `[server] port`, then 5001.
    pub fn port(&self) -> Result<u16> {
        match std::env::var(PORT_ENV) {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("{} is not a valid port: {}", PORT_ENV, raw)),
            Err(_) => Ok(self.server.port.unwrap_or(DEFAULT_PORT)),
        }
    }

    pub fn bind_address(&self) -> String {
        self.server.bind.clone().unwrap_or_else(|| DEFAULT_BIND.to_string())
    }

    pub fn api_url(&self) -> String {
        self.llm.api_url.clone().unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn api_key_env(&self) -> String {
        self.llm.api_key_env.clone().unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string())
    }

    /// Read the model API key from the configured environment variable.
    /// An unset or blank variable means no credential.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(self.api_key_env())
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm.timeout_seconds.unwrap_or(60))
    }

    /// Base URL the client uses to reach the service, validated.
    pub fn client_base_url(&self) -> Result<Url> {
        let raw = match &self.client.base_url {
            Some(url) => url.clone(),
            None => format!("http://{}:{}", DEFAULT_BIND, self.port()?),
        };
        Url::parse(&raw).with_context(|| format!("Invalid client base_url: {}", raw))
    }

    pub fn client_timeout(&self) -> Duration {
        Duration::from_secs(self.client.timeout_seconds.unwrap_or(DEFAULT_CLIENT_TIMEOUT_SECS))
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}
