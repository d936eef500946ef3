//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Waiting for the node:
//!     → readiness.rs (probe getinfo, bounded by attempts and total time)
//!     → backoff.rs (fixed interval, or exponential with jitter)
//! ```
//!
//! # Design Decisions
//! - Only readiness is retried; every other failure is terminal
//! - Waiting is bounded; running out is a distinct error

pub mod backoff;
pub mod readiness;

pub use readiness::{wait_for_rpc, Ready, ReadinessError};
