//! Configuration loading, validation, and management for Concierge.
//!
//! Loads configuration from `~/.concierge/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.concierge/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// LLM API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// LLM provider: "openai", "openrouter", "ollama", or "custom"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Override the provider base URL (required for "custom")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model used for both the relevance check and the answer
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Token cap for the relevance-check call
    #[serde(default = "default_relevance_max_tokens")]
    pub relevance_max_tokens: u32,

    /// Token cap for the answer call
    #[serde(default = "default_answer_max_tokens")]
    pub answer_max_tokens: u32,

    /// Sender name treated as the owner (profile dictation side channel)
    #[serde(default = "default_owner_name")]
    pub owner_name: String,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Pushover notification configuration
    #[serde(default)]
    pub pushover: PushoverConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_relevance_max_tokens() -> u32 {
    100
}
fn default_answer_max_tokens() -> u32 {
    300
}
fn default_owner_name() -> String {
    "David".into()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("relevance_max_tokens", &self.relevance_max_tokens)
            .field("answer_max_tokens", &self.answer_max_tokens)
            .field("owner_name", &self.owner_name)
            .field("gateway", &self.gateway)
            .field("pushover", &self.pushover)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    7860
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Pushover credentials. Both fields must be present for delivery;
/// otherwise notifications are logged and skipped.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PushoverConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_key: Option<String>,
}

impl std::fmt::Debug for PushoverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushoverConfig")
            .field("api_token", &redact(&self.api_token))
            .field("user_key", &redact(&self.user_key))
            .finish()
    }
}

impl PushoverConfig {
    pub fn is_configured(&self) -> bool {
        self.api_token.as_deref().is_some_and(|t| !t.is_empty())
            && self.user_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.concierge/config.toml).
    ///
    /// Also checks environment variables:
    /// - `CONCIERGE_API_KEY` (highest priority), `OPENAI_API_KEY`,
    ///   `OPENROUTER_API_KEY` for the LLM key
    /// - `PUSHOVER_API_TOKEN`, `PUSHOVER_USER_KEY` for notifications
    /// - `CONCIERGE_PROVIDER`, `CONCIERGE_MODEL`, `CONCIERGE_OWNER`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.api_key.is_none() {
            config.api_key = std::env::var("CONCIERGE_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok());
        }

        if config.pushover.api_token.is_none() {
            config.pushover.api_token = std::env::var("PUSHOVER_API_TOKEN").ok();
        }
        if config.pushover.user_key.is_none() {
            config.pushover.user_key = std::env::var("PUSHOVER_USER_KEY").ok();
        }

        if let Ok(provider) = std::env::var("CONCIERGE_PROVIDER") {
            config.provider = provider;
        }
        if let Ok(model) = std::env::var("CONCIERGE_MODEL") {
            config.model = model;
        }
        if let Ok(owner) = std::env::var("CONCIERGE_OWNER") {
            config.owner_name = owner;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".concierge")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.relevance_max_tokens == 0 || self.answer_max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "token limits must be greater than zero".into(),
            ));
        }

        if self.owner_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "owner_name must not be blank".into(),
            ));
        }

        if self.provider == "custom" && self.api_url.is_none() {
            return Err(ConfigError::ValidationError(
                "provider \"custom\" requires api_url".into(),
            ));
        }

        Ok(())
    }

    /// Check if an LLM API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `onboard` command).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            api_url: None,
            model: default_model(),
            temperature: default_temperature(),
            relevance_max_tokens: default_relevance_max_tokens(),
            answer_max_tokens: default_answer_max_tokens(),
            owner_name: default_owner_name(),
            gateway: GatewayConfig::default(),
            pushover: PushoverConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
