//! Node provisioning error definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::rpc::RpcError;

/// Errors writing the daemon conf file.
#[derive(Debug, Error)]
pub enum ConfWriteError {
    #[error("failed to create node directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors launching the daemon.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The binary could not be started at all (missing, not executable).
    #[error("failed to run {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The launch command returned a failure status.
    #[error("{binary} exited with {status} during {phase} launch")]
    ExitStatus {
        binary: String,
        phase: &'static str,
        status: String,
    },
}

/// Errors deriving the node identity and stopping the bootstrap node.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("public key not found in validateaddress output for {address}")]
    MissingPubkey { address: String },
}

/// Address and public key minted by the bootstrap node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIdentity {
    pub address: String,
    pub pubkey: String,
}
