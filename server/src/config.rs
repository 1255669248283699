//! Configuration management for the TURN credentials server
//!
//! Loaded once at startup from a TOML file, then overridden by environment
//! variables. The resulting [`Config`] is immutable for the process lifetime.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// TLS port used by the `turns:` URI unless overridden.
pub const DEFAULT_SECURE_PORT: u16 = 5349;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("TTL bounds must satisfy 0 < min_ttl <= default_ttl <= max_ttl (got {min}/{default}/{max})")]
    InvalidTtlBounds { min: u64, default: u64, max: u64 },

    #[error("relay_host must not be empty")]
    MissingRelayHost,

    #[error("{0} must not be zero")]
    ZeroPort(&'static str),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub turn: TurnConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnConfig {
    /// Shared secret, also configured on the relay (`static-auth-secret`).
    pub secret: String,
    pub relay_host: String,
    pub relay_port: u16,
    pub secure_port: u16,
    pub default_ttl: u64,
    pub min_ttl: u64,
    pub max_ttl: u64,
    /// Issue credentials with an empty secret instead of refusing.
    pub allow_insecure_secret: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Value expected in `X-API-Key`. Empty leaves the endpoint open.
    pub api_key: String,
}

/// Inclusive TTL range plus the value used when a request omits `ttl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlBounds {
    pub min: u64,
    pub default: u64,
    pub max: u64,
}

impl TurnConfig {
    pub fn ttl_bounds(&self) -> TtlBounds {
        TtlBounds {
            min: self.min_ttl,
            default: self.default_ttl,
            max: self.max_ttl,
        }
    }

    pub fn has_secret(&self) -> bool {
        !self.secret.is_empty()
    }
}

impl Config {
    pub async fn load(path: &str) -> anyhow::Result<Self> {
        let mut config = if Path::new(path).exists() {
            let content = fs::read_to_string(path).await?;
            toml::from_str::<Config>(&content)?
        } else {
            let config = Config::default();
            let content = toml::to_string_pretty(&config)?;
            fs::write(path, content).await?;
            tracing::info!("Created default config at {}", path);
            config
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override file values with whatever `lookup` returns for the known
    /// variable names.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("TURN_SECRET") {
            self.turn.secret = v;
        }
        if let Some(v) = lookup("TURN_SERVER") {
            self.turn.relay_host = v;
        }
        if let Some(v) = lookup("TURN_PORT") {
            self.turn.relay_port = parse_env("TURN_PORT", v)?;
        }
        if let Some(v) = lookup("TURN_SECURE_PORT") {
            self.turn.secure_port = parse_env("TURN_SECURE_PORT", v)?;
        }
        if let Some(v) = lookup("DEFAULT_TTL") {
            self.turn.default_ttl = parse_env("DEFAULT_TTL", v)?;
        }
        if let Some(v) = lookup("MIN_TTL") {
            self.turn.min_ttl = parse_env("MIN_TTL", v)?;
        }
        if let Some(v) = lookup("MAX_TTL") {
            self.turn.max_ttl = parse_env("MAX_TTL", v)?;
        }
        if let Some(v) = lookup("TURN_ALLOW_INSECURE_SECRET") {
            self.turn.allow_insecure_secret = parse_env("TURN_ALLOW_INSECURE_SECRET", v)?;
        }
        if let Some(v) = lookup("API_KEY") {
            self.auth.api_key = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let turn = &self.turn;
        if turn.min_ttl == 0 || turn.min_ttl > turn.default_ttl || turn.default_ttl > turn.max_ttl {
            return Err(ConfigError::InvalidTtlBounds {
                min: turn.min_ttl,
                default: turn.default_ttl,
                max: turn.max_ttl,
            });
        }
        if turn.relay_host.trim().is_empty() {
            return Err(ConfigError::MissingRelayHost);
        }
        if turn.relay_port == 0 {
            return Err(ConfigError::ZeroPort("relay_port"));
        }
        if turn.secure_port == 0 {
            return Err(ConfigError::ZeroPort("secure_port"));
        }
        Ok(())
    }

    /// Log the insecure states an operator must know about. Never fatal.
    pub fn log_diagnostics(&self) {
        if !self.turn.has_secret() {
            if self.turn.allow_insecure_secret {
                tracing::warn!(
                    "TURN_SECRET not set - issuing credentials with an empty key, they are NOT secure"
                );
            } else {
                tracing::error!(
                    "TURN_SECRET not set - credential requests will fail until a secret is configured"
                );
            }
        }
        if self.auth.api_key.is_empty() {
            tracing::warn!("API_KEY not set - endpoint is not protected");
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { name, value })
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            relay_host: "turn.example.com".to_string(),
            relay_port: 5349,
            secure_port: DEFAULT_SECURE_PORT,
            default_ttl: 86400, // 24 hours
            min_ttl: 60,
            max_ttl: 86400,
            allow_insecure_secret: false,
        }
    }
}
