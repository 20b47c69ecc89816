//! Settings validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and enumerations
//! - Reject default annotations outside the recognised vocabulary
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ControllerConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::net::SocketAddr;

use crate::annotations;
use crate::config::schema::ControllerConfig;
use crate::observability::logging::LOG_LEVELS;

/// A single semantic problem in the settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate controller settings.
pub fn validate_config(config: &ControllerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.controller.sync_period_secs == 0 {
        errors.push(ValidationError::new(
            "controller.sync_period_secs",
            "must be greater than 0",
        ));
    }

    let level = config.observability.log_level.as_str();
    if !LOG_LEVELS.contains(&level) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("value {:?} not permitted", level),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address {:?}", config.observability.metrics_address),
        ));
    }

    let mut names: Vec<&String> = config.defaults.keys().collect();
    names.sort();
    for name in names {
        if !annotations::is_known(name) {
            errors.push(ValidationError::new(
                format!("defaults.{}", name),
                "unknown annotation",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
