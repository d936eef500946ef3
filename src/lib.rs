//! Provisioning and mining harness for a ZOMBIE test chain node.

pub mod config;
pub mod lifecycle;
pub mod mining;
pub mod node;
pub mod observability;
pub mod resilience;
pub mod rpc;

pub use config::RunnerConfig;
pub use lifecycle::{Harness, HarnessError, Shutdown};
pub use rpc::{NodeRpc, RpcClient};
