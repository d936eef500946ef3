//! Address/key bootstrap against the first node instance.

use std::time::Duration;

use tokio::time::sleep;

use crate::node::types::{BootstrapError, NodeIdentity};
use crate::rpc::NodeRpc;

/// Mint a new address and look up its public key.
///
/// Fails with [`BootstrapError::MissingPubkey`] when `validateaddress`
/// returns no key; the final launch cannot proceed without one.
pub async fn derive_identity<R: NodeRpc>(rpc: &R) -> Result<NodeIdentity, BootstrapError> {
    let address = rpc.get_new_address().await?;
    tracing::info!(%address, "New address");

    let info = rpc.validate_address(&address).await?;
    let pubkey = info
        .pubkey()
        .ok_or_else(|| BootstrapError::MissingPubkey {
            address: address.clone(),
        })?
        .to_string();
    tracing::info!(%pubkey, "Retrieved pubkey");

    Ok(NodeIdentity { address, pubkey })
}

/// Ask the node to shut down, then give it `settle` to release the datadir.
pub async fn stop_node<R: NodeRpc>(rpc: &R, settle: Duration) -> Result<(), BootstrapError> {
    tracing::info!("Stopping the current node");
    let response = rpc.stop().await?;
    tracing::info!(%response, settle_ms = settle.as_millis() as u64, "Node stopping");
    sleep(settle).await;
    Ok(())
}
