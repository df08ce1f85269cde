//! Server configuration from the environment.
//!
//! # Invariants
//! - The provider API key is never cached: it is looked up on each request,
//!   so a missing key is a per-request configuration error, not a crash.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

/// Environment variable names.
pub mod env_vars {
    pub const BIND_ADDR: &str = "MARKNOTE_BIND_ADDR";
    pub const PROVIDER_URL: &str = "MARKNOTE_PROVIDER_URL";
    pub const MODEL: &str = "MARKNOTE_MODEL";
    pub const LOG_LEVEL: &str = "MARKNOTE_LOG_LEVEL";
    pub const API_KEY: &str = "GROQ_API_KEY";
}

pub mod defaults {
    pub const BIND_ADDR: &str = "127.0.0.1:3000";
    pub const PROVIDER_URL: &str = "https://api.groq.com/openai/v1";
    pub const MODEL: &str = "llama-3.3-70b-versatile";
    pub const TEMPERATURE: f32 = 0.7;
    pub const MAX_TOKENS: u32 = 200;
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidBindAddr { value: String, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBindAddr { value, message } => write!(
                f,
                "invalid {} `{value}`: {message}",
                env_vars::BIND_ADDR
            ),
        }
    }
}

impl Error for ConfigError {}

/// Chat-completion call parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Base URL; `/chat/completions` is appended.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::PROVIDER_URL.to_string(),
            model: defaults::MODEL.to_string(),
            temperature: defaults::TEMPERATURE,
            max_tokens: defaults::MAX_TOKENS,
        }
    }
}

impl ProviderConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub provider: ProviderConfig,
    pub log_level: String,
}

impl ServerConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_value =
            read(env_vars::BIND_ADDR).unwrap_or_else(|| defaults::BIND_ADDR.to_string());
        let bind_addr = bind_value
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::InvalidBindAddr {
                value: bind_value.clone(),
                message: err.to_string(),
            })?;

        let provider = ProviderConfig {
            base_url: read(env_vars::PROVIDER_URL)
                .unwrap_or_else(|| defaults::PROVIDER_URL.to_string()),
            model: read(env_vars::MODEL).unwrap_or_else(|| defaults::MODEL.to_string()),
            ..ProviderConfig::default()
        };

        Ok(Self {
            bind_addr,
            provider,
            log_level: read(env_vars::LOG_LEVEL)
                .unwrap_or_else(|| marknote_core::default_log_level().to_string()),
        })
    }
}

/// Resolves the provider API key at request time.
pub trait ApiKeySource: Send + Sync {
    /// Returns the key, or `None` when it is unset or blank.
    fn api_key(&self) -> Option<String>;
}

/// Reads the key from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvApiKey {
    var: String,
}

impl EnvApiKey {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvApiKey {
    fn default() -> Self {
        Self::new(env_vars::API_KEY)
    }
}

impl ApiKeySource for EnvApiKey {
    fn api_key(&self) -> Option<String> {
        env::var(&self.var)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

/// Fixed key, mainly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticApiKey(pub Option<String>);

impl ApiKeySource for StaticApiKey {
    fn api_key(&self) -> Option<String> {
        self.0.clone().filter(|key| !key.trim().is_empty())
    }
}
