//! Configuration validation.
//!
//! Semantic checks on an assembled [`StatsConfig`]; syntactic concerns are
//! handled by clap. Returns all validation errors, not just the first, and
//! runs before any connection attempt.

use thiserror::Error;

use crate::config::schema::StatsConfig;

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("host must not be empty")]
    EmptyHost,

    /// The URI scheme is added when building the connection string.
    #[error("host must not include a scheme: {0}")]
    HostWithScheme(String),

    #[error("database name must not be empty")]
    EmptyDatabase,

    #[error("collection name must not be empty")]
    EmptyCollection,

    #[error("connect timeout must be at least 1 second")]
    ZeroTimeout,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &StatsConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.host.is_empty() {
        errors.push(ValidationError::EmptyHost);
    } else if config.host.contains("://") {
        errors.push(ValidationError::HostWithScheme(config.host.clone()));
    }

    if config.database.is_empty() {
        errors.push(ValidationError::EmptyDatabase);
    }

    if config.collection.is_empty() {
        errors.push(ValidationError::EmptyCollection);
    }

    if config.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
