//! Per-service failures recorded by the bootstrapper.

use std::time::Duration;

use thiserror::Error;

use super::{ResolutionError, StartError};

/// Why a single service spec did not reach the registered state.
///
/// None of these abort a bootstrap run; they are reported per spec.
#[derive(Debug, Error)]
pub enum BootError {
    #[error("Invalid service spec: {0}")]
    InvalidSpec(String),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Start(#[from] StartError),

    #[error("Service {service} did not start within {timeout:?}")]
    StartTimeout { service: String, timeout: Duration },

    #[error("Bootstrap cancelled")]
    Cancelled,
}

impl BootError {
    /// Returns true if the failure happened while resolving the implementation.
    pub fn is_resolution(&self) -> bool {
        matches!(self, BootError::Resolution(_))
    }

    /// Returns true if the failure happened inside (or around) `start()`.
    pub fn is_start(&self) -> bool {
        matches!(self, BootError::Start(_) | BootError::StartTimeout { .. })
    }
}
