//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::loader::ConfigLoader;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bootstrap: BootstrapConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Entries seeded into the root context before any service boots.
    #[serde(default)]
    pub context: BTreeMap<String, serde_json::Value>,

    /// Declared services, in boot order.
    #[serde(default)]
    pub services: Vec<ServiceEntry>,
}

impl Config {
    /// Enabled service entries in declaration order.
    pub fn enabled_services(&self) -> impl Iterator<Item = &ServiceEntry> + '_ {
        self.services.iter().filter(|s| s.enabled)
    }
}

/// Bootstrap behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Upper bound for each service's `start()`; 0 disables it.
    #[serde(default = "default_start_timeout")]
    pub start_timeout_secs: u64,

    /// Upper bound for each service's `stop()` during shutdown.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl BootstrapConfig {
    pub fn start_timeout(&self) -> Duration {
        Duration::from_secs(self.start_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            start_timeout_secs: default_start_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

fn default_start_timeout() -> u64 {
    30
}

fn default_shutdown_timeout() -> u64 {
    10
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for rolling log files.
    #[serde(default = "default_log_dir")]
    pub dir: String,

    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_dir() -> String {
    ConfigLoader::nanos_dir().join("logs").display().to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// One declared service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub name: String,

    pub implementation: String,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Per-service settings handed to the constructor.
    #[serde(default)]
    pub config: serde_json::Value,
}

fn default_true() -> bool {
    true
}
