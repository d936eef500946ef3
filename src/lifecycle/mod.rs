//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Write conf → Launch → Await RPC → Derive key → Stop
//!         → Relaunch with pubkey → Await RPC → Mining loop
//!
//! Shutdown (shutdown.rs):
//!     Broadcast to the harness and the mining loop
//!
//! Signals (signals.rs):
//!     SIGINT → Trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Harness, HarnessError, Phase};
