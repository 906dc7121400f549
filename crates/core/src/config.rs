//! Configuration management for Courier.
//!
//! Sources are layered: built-in defaults, then an optional TOML file, then
//! individual environment overrides.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::{CoreError, CoreResult};

/// Path to a TOML configuration file.
pub const ENV_CONFIG: &str = "COURIER_CONFIG";
/// Node listen port override.
pub const ENV_PORT: &str = "COURIER_PORT";
/// Certificate authority name override.
pub const ENV_CA_NAME: &str = "COURIER_CA_NAME";
/// `true`/`1` switches logging to JSON.
pub const ENV_LOG_JSON: &str = "COURIER_LOG_JSON";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub domain: DomainConfig,
    pub node: NodeConfig,
    pub logging: LoggingConfig,
}

/// Trust domain bootstrapped at startup and on every reset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DomainConfig {
    pub ca_name: String,
    pub principals: Vec<String>,
    pub validity_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NodeConfig {
    pub bind_addr: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            ca_name: "Academic CA".to_string(),
            principals: vec!["Alice".to_string(), "Bob".to_string()],
            validity_days: 365,
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    /// Load from the process environment and validate.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_CONFIG) {
            Some(path) => Self::from_file(path)?,
            None => Self::default_config(),
        };

        if let Some(port) = lookup(ENV_PORT) {
            config.node.port = port.parse().map_err(|_| {
                CoreError::Config(format!("{} is not a valid port: {}", ENV_PORT, port))
            })?;
        }
        if let Some(name) = lookup(ENV_CA_NAME) {
            config.domain.ca_name = name;
        }
        if let Some(json) = lookup(ENV_LOG_JSON) {
            config.logging.json =
                matches!(json.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.domain.ca_name.trim().is_empty() {
            return Err(CoreError::Config("domain.ca_name must not be empty".to_string()));
        }
        if self.domain.principals.len() < 2 {
            return Err(CoreError::Config(
                "domain.principals needs at least two names".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for name in &self.domain.principals {
            if name.trim().is_empty() {
                return Err(CoreError::Config("principal names must not be empty".to_string()));
            }
            if !seen.insert(name.as_str()) {
                return Err(CoreError::Config(format!("duplicate principal: {}", name)));
            }
        }
        if self.domain.validity_days <= 0 {
            return Err(CoreError::Config(
                "domain.validity_days must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// `bind_addr:port` for the node listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.node.bind_addr, self.node.port)
    }
}
