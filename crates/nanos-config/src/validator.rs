//! Configuration validation.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::schema::Config;

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_bootstrap(config, &mut result);
        Self::validate_logging(config, &mut result);
        Self::validate_services(config, &mut result);

        Ok(result)
    }

    fn validate_bootstrap(config: &Config, result: &mut ValidationResult) {
        if config.bootstrap.start_timeout_secs == 0 {
            result.add_warning(ValidationWarning::new(
                "bootstrap.start_timeout_secs",
                "start timeout disabled, a hanging service will stall the bootstrap",
            ));
        }

        if config.bootstrap.shutdown_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "bootstrap.shutdown_timeout_secs",
                "shutdown_timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        if config.logging.dir.is_empty() {
            result.add_error(ValidationError::new(
                "logging.dir",
                "Log directory cannot be empty",
            ));
        }
    }

    fn validate_services(config: &Config, result: &mut ValidationResult) {
        let mut seen = HashSet::new();

        for (i, service) in config.services.iter().enumerate() {
            if service.name.is_empty() {
                result.add_error(ValidationError::new(
                    format!("services[{}].name", i),
                    "Service name cannot be empty",
                ));
            }

            if service.implementation.is_empty() {
                result.add_error(ValidationError::new(
                    format!("services[{}].implementation", i),
                    "Service implementation cannot be empty",
                ));
            }

            // Duplicates are allowed; the later registration replaces the earlier one.
            if service.enabled && !service.name.is_empty() && !seen.insert(service.name.as_str()) {
                result.add_warning(ValidationWarning::new(
                    format!("services[{}].name", i),
                    format!(
                        "Duplicate service name '{}', the later registration wins",
                        service.name
                    ),
                ));
            }

            if !service.config.is_null() && !service.config.is_object() {
                result.add_error(ValidationError::new(
                    format!("services[{}].config", i),
                    "Service config must be a table",
                ));
            }

            if config.context.contains_key(&service.name) {
                result.add_warning(ValidationWarning::new(
                    format!("services[{}].name", i),
                    format!(
                        "Service '{}' will replace the context entry of the same name",
                        service.name
                    ),
                ));
            }
        }
    }
}
