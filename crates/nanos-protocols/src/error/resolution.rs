//! Errors raised while turning an implementation identifier into an instance.

use thiserror::Error;

/// Coarse classification of a [`ResolutionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    /// No implementation is registered under the identifier.
    NotFound,
    /// The implementation exists but construction did not complete.
    Uninstantiable,
}

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Service implementation not found: {0}")]
    NotFound(String),

    #[error("Service implementation {implementation} could not be instantiated: {reason}")]
    Uninstantiable {
        implementation: String,
        reason: String,
    },
}

impl ResolutionError {
    /// Returns the kind of resolution failure.
    pub fn kind(&self) -> ResolutionKind {
        match self {
            ResolutionError::NotFound(_) => ResolutionKind::NotFound,
            ResolutionError::Uninstantiable { .. } => ResolutionKind::Uninstantiable,
        }
    }

    /// Returns the implementation identifier that failed to resolve.
    pub fn implementation(&self) -> &str {
        match self {
            ResolutionError::NotFound(implementation) => implementation,
            ResolutionError::Uninstantiable { implementation, .. } => implementation,
        }
    }
}
