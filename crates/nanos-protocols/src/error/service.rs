//! Errors surfaced by a service's own lifecycle methods.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartError {
    #[error("Service start failed: {0}")]
    Failed(String),

    #[error("Required service not available in context: {0}")]
    MissingDependency(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
#[error("Service stop failed: {0}")]
pub struct StopError(pub String);
