//! Configuration management for the account-server backend.
//!
//! This module provides TOML-based configuration file loading and saving.
//! The default configuration path is `~/.config/accountserver/config.toml`.
//!
//! Besides logging and HTTP client settings, the file carries the ordered
//! list of administrator-approved connection profiles that every session is
//! validated against.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use backend::{Params, TYPE_PARAM};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::TYPE_NAME;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("log_level must be one of: trace, debug, info, warn, error; got {0}")]
    InvalidLogLevel(String),

    #[error("timeout_secs must be between 1 and 600 seconds, got {0}")]
    InvalidTimeout(u64),

    #[error("connection profile #{0} has no type")]
    MissingProfileType(usize),

    #[error("connection profile #{index} has an invalid url: {url}")]
    InvalidProfileUrl { index: usize, url: String },
}

/// Outcome of consulting one environment variable during
/// [`Config::apply_env_overrides`].
///
/// Overrides are applied before logging is set up, so they are returned to
/// the caller to be logged once a subscriber exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvOverride {
    /// The variable replaced a configured value.
    Applied { var: &'static str, value: String },

    /// The variable was set but could not be used.
    Ignored {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl EnvOverride {
    /// Emit this outcome through `tracing`.
    pub fn log(&self) {
        match self {
            Self::Applied { .. } => tracing::info!("{}", self),
            Self::Ignored { .. } => tracing::warn!("{}", self),
        }
    }
}

impl std::fmt::Display for EnvOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Applied { var, value } => write!(f, "Overriding from {}: {}", var, value),
            Self::Ignored { var, value, reason } => {
                write!(f, "Ignoring {}={:?}: {}", var, value, reason)
            }
        }
    }
}

/// Valid log level values for tracing configuration.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Bounds for the HTTP request timeout, in seconds.
const MIN_TIMEOUT_SECS: u64 = 1;
const MAX_TIMEOUT_SECS: u64 = 600;

/// Environment variables read by [`Config::apply_env_overrides`].
pub const ENV_LOG_LEVEL: &str = "ACCOUNTSERVER_LOG_LEVEL";
pub const ENV_HTTP_TIMEOUT: &str = "ACCOUNTSERVER_HTTP_TIMEOUT";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Logging configuration.
    pub logging: LoggingConfig,

    /// HTTP client configuration for the account server.
    pub http: HttpConfig,

    /// Approved connection profiles, in evaluation order.
    pub connections: Vec<ConnectionProfile>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    pub log_level: String,
}

/// HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// User agent sent to the account server.
    pub user_agent: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("accountserver-backend/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// An administrator-approved set of parameter constraints.
///
/// Scalar TOML values (strings, booleans, numbers) are stored in their
/// string form so they compare directly against session parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionProfile {
    #[serde(deserialize_with = "deserialize_scalar_map")]
    params: Params,
}

impl ConnectionProfile {
    /// Create a profile from its parameters.
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// The profile's `type` discriminator, if set.
    pub fn type_name(&self) -> Option<&str> {
        self.get(TYPE_PARAM)
    }

    /// Look up a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// All parameters of the profile.
    pub fn params(&self) -> &Params {
        &self.params
    }
}

impl From<Params> for ConnectionProfile {
    fn from(params: Params) -> Self {
        Self::new(params)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScalarValue {
    String(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
}

impl ScalarValue {
    fn into_string(self) -> String {
        match self {
            ScalarValue::String(s) => s,
            ScalarValue::Bool(b) => b.to_string(),
            ScalarValue::Integer(i) => i.to_string(),
            ScalarValue::Float(f) => f.to_string(),
        }
    }
}

fn deserialize_scalar_map<'de, D>(deserializer: D) -> std::result::Result<Params, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, ScalarValue>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(k, v)| (k, v.into_string())).collect())
}

/// Returns the default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("accountserver")
        .join("config.toml")
}

impl Config {
    /// Apply environment variable overrides to the configuration.
    ///
    /// Environment variables take precedence over config file values.
    /// Supported variables:
    /// - ACCOUNTSERVER_LOG_LEVEL: Override log level (trace, debug, info, warn, error)
    /// - ACCOUNTSERVER_HTTP_TIMEOUT: Override the HTTP timeout in seconds
    ///
    /// Empty variables are skipped. Every variable that was consulted is
    /// reported in the returned list.
    #[must_use = "overrides should be logged once tracing is initialized"]
    pub fn apply_env_overrides(&mut self) -> Vec<EnvOverride> {
        let mut overrides = Vec::new();

        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            if !level.is_empty() {
                self.logging.log_level = level.clone();
                overrides.push(EnvOverride::Applied {
                    var: ENV_LOG_LEVEL,
                    value: level,
                });
            }
        }

        if let Ok(timeout) = std::env::var(ENV_HTTP_TIMEOUT) {
            if !timeout.is_empty() {
                match timeout.parse::<u64>() {
                    Ok(secs) => {
                        self.http.timeout_secs = secs;
                        overrides.push(EnvOverride::Applied {
                            var: ENV_HTTP_TIMEOUT,
                            value: timeout,
                        });
                    }
                    Err(e) => overrides.push(EnvOverride::Ignored {
                        var: ENV_HTTP_TIMEOUT,
                        value: timeout,
                        reason: e.to_string(),
                    }),
                }
            }
        }

        overrides
    }

    /// Validate the configuration values.
    ///
    /// Returns an error if any configuration value is outside the valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.log_level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.logging.log_level.clone()));
        }

        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&self.http.timeout_secs) {
            return Err(ConfigError::InvalidTimeout(self.http.timeout_secs));
        }

        for (index, profile) in self.connections.iter().enumerate() {
            let type_name = match profile.type_name() {
                Some(t) if !t.is_empty() => t,
                _ => return Err(ConfigError::MissingProfileType(index)),
            };

            if type_name != TYPE_NAME {
                continue;
            }

            if let Some(raw) = profile.get("url") {
                let valid = url::Url::parse(raw)
                    .map(|u| matches!(u.scheme(), "http" | "https"))
                    .unwrap_or(false);
                if !valid {
                    return Err(ConfigError::InvalidProfileUrl {
                        index,
                        url: raw.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Load configuration from a file.
    ///
    /// If the file does not exist, returns the default configuration.
    /// If the file exists but is invalid TOML, returns an error with
    /// a helpful message.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self> {
        Self::load(default_config_path())
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| anyhow::anyhow!("Invalid TOML configuration: {}", format_toml_error(&e)))
    }

    /// Save configuration to a file.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = self.to_toml()?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::debug!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Profiles that apply to this backend type, in configured order.
    pub fn profiles_for(&self, type_name: &str) -> impl Iterator<Item = &ConnectionProfile> {
        let type_name = type_name.to_string();
        self.connections
            .iter()
            .filter(move |p| p.type_name() == Some(type_name.as_str()))
    }
}

/// Format a TOML deserialization error for user-friendly display.
fn format_toml_error(error: &toml::de::Error) -> String {
    let mut msg = error.message().to_string();

    if let Some(span) = error.span() {
        msg.push_str(&format!(" (at position {}..{})", span.start, span.end));
    }

    msg
}
