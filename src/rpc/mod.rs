//! Node RPC subsystem.
//!
//! # Data Flow
//! ```text
//! RpcConfig (host, port, credentials, timeout)
//!     → client.rs (HTTP JSON-RPC with basic auth)
//!     → types.rs (typed payloads, RpcError)
//! ```
//!
//! # Design Decisions
//! - One typed method per call the runner makes; no dispatch by name
//! - Every call has a deadline
//! - No retries in the client; callers decide what is retryable

pub mod client;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{NodeRpc, RpcClient};
pub use types::{AddressInfo, NodeInfo, RpcError, RpcResult, ShieldResult, ShieldedAddressInfo};
