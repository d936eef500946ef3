//! Node JSON-RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Issue JSON-RPC 1.0 calls over HTTP with basic-auth credentials
//! - Decode results into typed payloads
//! - Bound every call with a per-call timeout
//!
//! The client never retries; see `resilience::readiness`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::time::timeout;
use url::Url;

use crate::config::RpcConfig;
use crate::observability::metrics;
use crate::rpc::types::{
    AddressInfo, NodeInfo, RpcError, RpcResult, ShieldResult, ShieldedAddressInfo,
};

/// The calls the runner makes against the node.
#[allow(async_fn_in_trait)]
pub trait NodeRpc {
    /// `getinfo`
    async fn get_info(&self) -> RpcResult<NodeInfo>;

    /// `getnewaddress`
    async fn get_new_address(&self) -> RpcResult<String>;

    /// `validateaddress`
    async fn validate_address(&self, address: &str) -> RpcResult<AddressInfo>;

    /// `stop`
    async fn stop(&self) -> RpcResult<String>;

    /// `z_validateaddress`
    async fn z_validate_address(&self, address: &str) -> RpcResult<ShieldedAddressInfo>;

    /// `setgenerate`
    async fn set_generate(&self, generate: bool, threads: u32) -> RpcResult<()>;

    /// `getbalance`
    async fn get_balance(&self) -> RpcResult<f64>;

    /// `z_shieldcoinbase`
    async fn z_shield_coinbase(&self, from: &str, to: &str) -> RpcResult<ShieldResult>;
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// HTTP JSON-RPC client for a single node.
pub struct RpcClient {
    http: reqwest::Client,
    endpoint: Url,
    user: String,
    password: String,
    timeout_duration: Duration,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a client for `http://<host>:<port>/`.
    pub fn new(config: &RpcConfig) -> RpcResult<Self> {
        let raw = format!("http://{}:{}/", config.host, config.port);
        let endpoint: Url = raw.parse().map_err(|_| RpcError::Endpoint(raw.clone()))?;

        let http = reqwest::Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| RpcError::Transport {
                method: "client",
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            endpoint,
            user: config.user.clone(),
            password: config.password.clone(),
            timeout_duration: Duration::from_secs(config.timeout_secs),
            next_id: AtomicU64::new(1),
        })
    }

    /// The endpoint calls are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn call<T: DeserializeOwned>(&self, method: &'static str, params: Value) -> RpcResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "1.0",
            "id": id,
            "method": method,
            "params": params,
        });

        metrics::record_rpc_call(method);
        tracing::debug!(method, id, "RPC call");

        let request = async {
            let response = self
                .http
                .post(self.endpoint.clone())
                .basic_auth(&self.user, Some(&self.password))
                .json(&body)
                .send()
                .await
                .map_err(|e| RpcError::Transport {
                    method,
                    message: e.to_string(),
                })?;

            let status = response.status();
            let text = response.text().await.map_err(|e| RpcError::Transport {
                method,
                message: e.to_string(),
            })?;
            decode_response(method, status, &text)
        };

        let result = match timeout(self.timeout_duration, request).await {
            Ok(result) => result,
            Err(_) => Err(RpcError::Timeout {
                method,
                secs: self.timeout_duration.as_secs(),
            }),
        };

        if let Err(e) = &result {
            metrics::record_rpc_error(method);
            tracing::debug!(method, id, error = %e, "RPC call failed");
        }
        result
    }
}

/// Decode a JSON-RPC response body.
///
/// The node reports RPC-level errors with HTTP 500 and a JSON body, so the
/// body is inspected before the status code.
pub(crate) fn decode_response<T: DeserializeOwned>(
    method: &'static str,
    status: StatusCode,
    body: &str,
) -> RpcResult<T> {
    let response: RpcResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) if status.is_success() => {
            return Err(RpcError::Decode {
                method,
                message: e.to_string(),
            })
        }
        Err(_) => {
            return Err(RpcError::HttpStatus {
                method,
                status: status.as_u16(),
                body: body.trim().to_string(),
            })
        }
    };

    if let Some(error) = response.error {
        return Err(RpcError::Server {
            method,
            code: error.code,
            message: error.message,
        });
    }

    serde_json::from_value(response.result.unwrap_or(Value::Null)).map_err(|e| RpcError::Decode {
        method,
        message: e.to_string(),
    })
}

impl NodeRpc for RpcClient {
    async fn get_info(&self) -> RpcResult<NodeInfo> {
        self.call("getinfo", json!([])).await
    }

    async fn get_new_address(&self) -> RpcResult<String> {
        self.call("getnewaddress", json!([])).await
    }

    async fn validate_address(&self, address: &str) -> RpcResult<AddressInfo> {
        self.call("validateaddress", json!([address])).await
    }

    async fn stop(&self) -> RpcResult<String> {
        self.call("stop", json!([])).await
    }

    async fn z_validate_address(&self, address: &str) -> RpcResult<ShieldedAddressInfo> {
        self.call("z_validateaddress", json!([address])).await
    }

    async fn set_generate(&self, generate: bool, threads: u32) -> RpcResult<()> {
        self.call("setgenerate", json!([generate, threads])).await
    }

    async fn get_balance(&self) -> RpcResult<f64> {
        self.call("getbalance", json!([])).await
    }

    async fn z_shield_coinbase(&self, from: &str, to: &str) -> RpcResult<ShieldResult> {
        self.call("z_shieldcoinbase", json!([from, to])).await
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("user", &self.user)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
