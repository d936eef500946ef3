//! Node provisioning subsystem.
//!
//! # Data Flow
//! ```text
//! RunnerConfig
//!     → conf.rs (write <node_dir>/<chain>.conf)
//!     → launcher.rs (bootstrap launch, exit status checked)
//!     → bootstrap.rs (new address → pubkey, then stop)
//!     → launcher.rs (final launch with -pubkey)
//! ```

pub mod bootstrap;
pub mod conf;
pub mod launcher;
pub mod types;

pub use bootstrap::{derive_identity, stop_node};
pub use conf::write_conf;
pub use launcher::{LaunchPhase, Launcher};
pub use types::{BootstrapError, ConfWriteError, LaunchError, NodeIdentity};
