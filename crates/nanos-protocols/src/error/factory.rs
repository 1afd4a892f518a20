//! Errors raised while populating a service factory.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("Service implementation already registered: {0}")]
    AlreadyRegistered(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_registered_error() {
        let err = FactoryError::AlreadyRegistered("nanos.http.HttpServer".to_string());
        let display = err.to_string();
        assert!(display.contains("already registered"));
        assert!(display.contains("nanos.http.HttpServer"));
    }
}
