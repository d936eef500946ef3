//! Node RPC payload types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Subset of the `getinfo` response the runner relies on.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NodeInfo {
    pub version: Option<u64>,
    pub name: Option<String>,
    pub blocks: u64,
    pub connections: u64,
    pub balance: Option<f64>,
}

/// `validateaddress` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AddressInfo {
    pub isvalid: bool,
    pub address: Option<String>,
    pub pubkey: Option<String>,
    pub ismine: Option<bool>,
}

impl AddressInfo {
    /// The public key, if present and non-empty.
    pub fn pubkey(&self) -> Option<&str> {
        self.pubkey.as_deref().filter(|key| !key.is_empty())
    }
}

/// `z_validateaddress` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShieldedAddressInfo {
    pub isvalid: bool,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub ismine: Option<bool>,
}

/// `z_shieldcoinbase` response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ShieldResult {
    #[serde(rename = "remainingUTXOs", default)]
    pub remaining_utxos: u64,
    #[serde(rename = "remainingValue", default)]
    pub remaining_value: f64,
    #[serde(rename = "shieldingUTXOs", default)]
    pub shielding_utxos: u64,
    #[serde(rename = "shieldingValue", default)]
    pub shielding_value: f64,
    /// Async operation id to poll with `z_getoperationstatus`.
    pub opid: String,
}

/// Errors that can occur talking to the node.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Connection refused, reset, or other transport failure.
    #[error("transport error calling {method}: {message}")]
    Transport { method: &'static str, message: String },

    /// Call did not complete within the per-call deadline.
    #[error("{method} timed out after {secs} seconds")]
    Timeout { method: &'static str, secs: u64 },

    /// Non-success HTTP status without a JSON-RPC body.
    #[error("{method} returned HTTP {status}: {body}")]
    HttpStatus {
        method: &'static str,
        status: u16,
        body: String,
    },

    /// The node answered with a JSON-RPC error object.
    #[error("{method} failed with code {code}: {message}")]
    Server {
        method: &'static str,
        code: i64,
        message: String,
    },

    /// Response body did not match the expected shape.
    #[error("could not decode {method} response: {message}")]
    Decode { method: &'static str, message: String },

    /// Endpoint could not be built from configuration.
    #[error("invalid RPC endpoint '{0}'")]
    Endpoint(String),
}

impl RpcError {
    /// True when the node never answered (useful while it is starting).
    pub fn is_unreachable(&self) -> bool {
        matches!(self, RpcError::Transport { .. } | RpcError::Timeout { .. })
    }
}

/// Result type for node RPC calls.
pub type RpcResult<T> = Result<T, RpcError>;
