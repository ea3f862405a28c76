//! Configuration System
//!
//! Provides hierarchical configuration loading from:
//! - rpc.toml (default configuration)
//! - rpc.local.toml (git-ignored local overrides)
//! - Environment variables (SPDK_RPC_* prefix)
//!
//! ## Example
//!
//! ```toml
//! # rpc.toml
//! [client]
//! address = "/var/tmp/spdk.sock"
//! timeout_secs = 30.0
//!
//! [deprecation]
//! policy = "once"
//! ```
//!
//! Environment variable overrides:
//! ```bash
//! SPDK_RPC_CLIENT__ADDRESS=10.0.0.5
//! SPDK_RPC_CLIENT__PORT=5260
//! SPDK_RPC_DEPRECATION__POLICY=every_call
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub deprecation: DeprecationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// RPC listener connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Unix socket path (leading `/`) or host name / IP address
    #[serde(default = "default_address")]
    pub address: String,

    /// TCP port, ignored for Unix sockets
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-call read/write timeout in seconds. 0 = wait forever.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,

    /// Extra connection attempts before giving up
    #[serde(default)]
    pub conn_retries: u32,
}

/// Deprecated-alias behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeprecationConfig {
    #[serde(default)]
    pub policy: DeprecationPolicy,
}

/// How often a legacy method name produces a deprecation notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeprecationPolicy {
    /// Every call made through a legacy name
    #[default]
    EveryCall,
    /// First call through each legacy name only
    Once,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Also append logs to this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

// Default value functions
fn default_address() -> String {
    "/var/tmp/spdk.sock".to_string()
}
fn default_port() -> u16 {
    5260
}
fn default_timeout_secs() -> f64 {
    60.0
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Merges in order:
    /// 1. rpc.toml (base configuration)
    /// 2. rpc.local.toml (local overrides, git-ignored)
    /// 3. Environment variables (SPDK_RPC_* prefix)
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("rpc.toml"))
            .merge(Toml::file("rpc.local.toml"))
            .merge(Env::prefixed("SPDK_RPC_").split("__"))
            .extract()
    }

    /// Load configuration from specific file path
    pub fn from_file(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("SPDK_RPC_").split("__"))
            .extract()
    }
}

impl ClientConfig {
    /// Timeout as a `Duration`, `None` when disabled
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs > 0.0 && self.timeout_secs.is_finite() {
            Some(Duration::from_secs_f64(self.timeout_secs))
        } else {
            None
        }
    }

    /// Human-readable endpoint, used in errors and logs
    pub fn endpoint(&self) -> String {
        if self.address.starts_with('/') {
            self.address.clone()
        } else {
            format!("{}:{}", self.address, self.port)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            address: default_address(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            conn_retries: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}
