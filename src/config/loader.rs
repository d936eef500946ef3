//! Configuration loading from disk and the environment.

use std::path::Path;
use std::fs;
use crate::config::schema::{RunnerConfig, RPC_PORT_ENV};
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, value } => {
                write!(f, "Invalid value '{}' for environment variable {}", value, var)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a TOML file without validating it.
///
/// Env and CLI overrides go on top before [`validate_config`] runs.
///
/// [`validate_config`]: crate::config::validate_config
pub fn read_config(path: &Path) -> Result<RunnerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Apply environment overrides through `lookup`.
///
/// Only `COIN_RPC_PORT` is honoured. A value that is not a port number is an
/// error rather than a silent fallback to the default.
pub fn apply_env_overrides<F>(config: &mut RunnerConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(RPC_PORT_ENV) {
        let port = value.trim().parse::<u16>().map_err(|_| ConfigError::Env {
            var: RPC_PORT_ENV,
            value: value.clone(),
        })?;
        config.rpc.port = port;
    }
    Ok(())
}
