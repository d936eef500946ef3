//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → COIN_RPC_PORT override
//!     → CLI overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → RunnerConfig (validated, immutable for the run)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; no file at all is a valid setup
//! - Precedence: defaults < file < environment < command line
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, read_config, ConfigError};
pub use schema::RunnerConfig;
pub use schema::{ChainConfig, MiningConfig, NodeConfig, ObservabilityConfig, ReadinessConfig, RpcConfig};
pub use validation::{validate_config, ValidationError};
