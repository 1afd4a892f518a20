//! Declarative service specifications.

use serde::{Deserialize, Serialize};

/// Immutable record describing one service to boot.
///
/// `name` is the key the started service is registered under in the
/// [`Context`](crate::Context); `implementation` is the identifier a service
/// factory resolves to a constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSpec {
    name: String,
    implementation: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    config: serde_json::Value,
}

impl ServiceSpec {
    /// Create a spec with no per-service configuration.
    pub fn new(name: impl Into<String>, implementation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            implementation: implementation.into(),
            config: serde_json::Value::Null,
        }
    }

    /// Attach per-service configuration handed to the constructor.
    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    pub fn config(&self) -> &serde_json::Value {
        &self.config
    }

    /// Get a typed value from the per-service configuration.
    pub fn get_config<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.config
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}
