// src/config.rs

//! Manages server configuration: loading, resolving defaults, and validation.

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::time::Duration;
use tracing::warn;

/// Configuration for the Prometheus metrics exporter.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct MetricsConfig {
    /// If true, an HTTP server will be started to expose Prometheus metrics.
    #[serde(default)]
    pub enabled: bool,
    /// The port for the Prometheus metrics server.
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

fn default_metrics_port() -> u16 {
    9878
}

/// A raw representation of the config file before validation and resolution.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    password: Option<String>,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_max_clients")]
    max_clients: usize,
    #[serde(default = "default_connection_timeout_secs")]
    connection_timeout_secs: u64,
    #[serde(default)]
    catalog_file: Option<String>,
    #[serde(default)]
    metrics: MetricsConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    6600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_max_clients() -> usize {
    1024
}
fn default_connection_timeout_secs() -> u64 {
    60
}

/// Represents the final, validated, and resolved server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// The shared secret clients must send with `password`. `None` disables authentication.
    pub password: Option<String>,
    pub log_level: String,
    pub max_clients: usize,
    /// Idle clients are disconnected after this many seconds. `0` disables the timeout.
    pub connection_timeout_secs: u64,
    /// Path to the TOML track index loaded at startup.
    pub catalog_file: Option<String>,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            password: None,
            log_level: default_log_level(),
            max_clients: default_max_clients(),
            connection_timeout_secs: default_connection_timeout_secs(),
            catalog_file: None,
            metrics: MetricsConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        Self::from_toml_str(&contents).with_context(|| format!("Invalid config in '{path}'"))
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let raw_config: RawConfig =
            toml::from_str(contents).context("Failed to parse configuration TOML")?;

        let config = Config {
            host: raw_config.host,
            port: raw_config.port,
            // An empty password is the same as no password at all.
            password: raw_config.password.filter(|p| !p.is_empty()),
            log_level: raw_config.log_level,
            max_clients: raw_config.max_clients,
            connection_timeout_secs: raw_config.connection_timeout_secs,
            catalog_file: raw_config.catalog_file,
            metrics: raw_config.metrics,
        };

        config.validate()?;
        Ok(config)
    }

    /// The inactivity timeout for clients, or `None` if disabled.
    pub fn connection_timeout(&self) -> Option<Duration> {
        (self.connection_timeout_secs > 0).then(|| Duration::from_secs(self.connection_timeout_secs))
    }

    /// Validates the resolved configuration to ensure logical consistency.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("port cannot be 0"));
        }
        if self.host.trim().is_empty() {
            return Err(anyhow!("host cannot be empty"));
        }
        if self.max_clients == 0 {
            return Err(anyhow!("max_clients cannot be 0"));
        }
        if let Some(password) = &self.password
            && password.contains('"')
        {
            return Err(anyhow!("password cannot contain a double quote"));
        }
        if self.connection_timeout_secs > 0 && self.connection_timeout_secs < 5 {
            warn!(
                "low connection_timeout_secs setting: {}. Clients may be disconnected between commands.",
                self.connection_timeout_secs
            );
        }

        if self.metrics.enabled {
            if self.metrics.port == 0 {
                return Err(anyhow!("metrics.port cannot be 0"));
            }
            if self.metrics.port == self.port {
                return Err(anyhow!(
                    "metrics.port cannot be the same as the main server port"
                ));
            }
        }
        Ok(())
    }
}
