//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Reject chain names that cannot name a conf file
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RunnerConfig → Result<(), Vec<ValidationError>>
//! - Runs after env and CLI overrides are applied

use std::fmt;

use crate::config::schema::RunnerConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a fully resolved configuration.
pub fn validate_config(config: &RunnerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.node.daemon_bin.trim().is_empty() {
        errors.push(ValidationError::new("node.daemon_bin", "must not be empty"));
    }
    if config.node.node_dir.trim().is_empty() {
        errors.push(ValidationError::new("node.node_dir", "must not be empty"));
    }

    let name = &config.chain.name;
    if name.is_empty() {
        errors.push(ValidationError::new("chain.name", "must not be empty"));
    } else if name
        .chars()
        .any(|c| c.is_whitespace() || c == '/' || c == '\\')
    {
        errors.push(ValidationError::new(
            "chain.name",
            format!("'{}' contains whitespace or path separators", name),
        ));
    }
    if config.chain.p2p_port == 0 {
        errors.push(ValidationError::new("chain.p2p_port", "must be non-zero"));
    }

    if config.rpc.port == 0 {
        errors.push(ValidationError::new("rpc.port", "must be non-zero"));
    }
    if config.rpc.port == config.chain.p2p_port {
        errors.push(ValidationError::new(
            "rpc.port",
            format!("collides with chain.p2p_port {}", config.chain.p2p_port),
        ));
    }
    if config.rpc.host.trim().is_empty() {
        errors.push(ValidationError::new("rpc.host", "must not be empty"));
    }
    if config.rpc.user.is_empty() {
        errors.push(ValidationError::new("rpc.user", "must not be empty"));
    }
    if config.rpc.timeout_secs == 0 {
        errors.push(ValidationError::new("rpc.timeout_secs", "must be greater than 0"));
    }

    if config.readiness.max_attempts == 0 {
        errors.push(ValidationError::new(
            "readiness.max_attempts",
            "must be greater than 0",
        ));
    }
    if config.readiness.timeout_secs == 0 {
        errors.push(ValidationError::new(
            "readiness.timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.readiness.max_interval_ms < config.readiness.interval_ms {
        errors.push(ValidationError::new(
            "readiness.max_interval_ms",
            "must not be below readiness.interval_ms",
        ));
    }

    if config.mining.shielded_address.trim().is_empty() {
        errors.push(ValidationError::new(
            "mining.shielded_address",
            "must not be empty",
        ));
    }
    if config.mining.generate_threads == 0 {
        errors.push(ValidationError::new(
            "mining.generate_threads",
            "must be greater than 0",
        ));
    }
    if config.mining.max_iterations == Some(0) {
        errors.push(ValidationError::new(
            "mining.max_iterations",
            "must be greater than 0 when set",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
