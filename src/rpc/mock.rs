//! Scripted in-process node for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::rpc::client::NodeRpc;
use crate::rpc::types::{
    AddressInfo, NodeInfo, RpcError, RpcResult, ShieldResult, ShieldedAddressInfo,
};

pub(crate) fn node_info(blocks: u64) -> NodeInfo {
    NodeInfo {
        version: Some(3_000_300),
        name: Some("ZOMBIE".to_string()),
        blocks,
        connections: 0,
        balance: None,
    }
}

pub(crate) fn transport_error(method: &'static str) -> RpcError {
    RpcError::Transport {
        method,
        message: "connection refused".to_string(),
    }
}

/// Records every call by method name and pops scripted results.
/// Unscripted calls succeed with a neutral payload.
pub(crate) struct MockNode {
    calls: Mutex<Vec<&'static str>>,
    info: Mutex<VecDeque<RpcResult<NodeInfo>>>,
    balances: Mutex<VecDeque<RpcResult<f64>>>,
    pubkey: Option<String>,
    zaddr_valid: bool,
    failing: Vec<&'static str>,
}

impl MockNode {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            info: Mutex::new(VecDeque::new()),
            balances: Mutex::new(VecDeque::new()),
            pubkey: Some("02a1b2c3".to_string()),
            zaddr_valid: true,
            failing: Vec::new(),
        }
    }

    pub(crate) fn with_info(self, results: Vec<RpcResult<NodeInfo>>) -> Self {
        *self.info.lock().unwrap() = results.into();
        self
    }

    pub(crate) fn with_balances(self, results: Vec<RpcResult<f64>>) -> Self {
        *self.balances.lock().unwrap() = results.into();
        self
    }

    pub(crate) fn with_pubkey(mut self, pubkey: Option<&str>) -> Self {
        self.pubkey = pubkey.map(str::to_string);
        self
    }

    pub(crate) fn with_zaddr_valid(mut self, valid: bool) -> Self {
        self.zaddr_valid = valid;
        self
    }

    /// Every call to `method` fails with a transport error.
    pub(crate) fn failing(mut self, method: &'static str) -> Self {
        self.failing.push(method);
        self
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, method: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|m| **m == method).count()
    }

    fn record(&self, method: &'static str) -> RpcResult<()> {
        self.calls.lock().unwrap().push(method);
        if self.failing.contains(&method) {
            return Err(transport_error(method));
        }
        Ok(())
    }
}

impl NodeRpc for MockNode {
    async fn get_info(&self) -> RpcResult<NodeInfo> {
        self.record("getinfo")?;
        self.info.lock().unwrap().pop_front().unwrap_or_else(|| Ok(node_info(1)))
    }

    async fn get_new_address(&self) -> RpcResult<String> {
        self.record("getnewaddress")?;
        Ok("RTestAddress".to_string())
    }

    async fn validate_address(&self, address: &str) -> RpcResult<AddressInfo> {
        self.record("validateaddress")?;
        Ok(AddressInfo {
            isvalid: true,
            address: Some(address.to_string()),
            pubkey: self.pubkey.clone(),
            ismine: Some(true),
        })
    }

    async fn stop(&self) -> RpcResult<String> {
        self.record("stop")?;
        Ok("Komodo server stopping".to_string())
    }

    async fn z_validate_address(&self, address: &str) -> RpcResult<ShieldedAddressInfo> {
        self.record("z_validateaddress")?;
        Ok(ShieldedAddressInfo {
            isvalid: self.zaddr_valid,
            address: Some(address.to_string()),
            kind: Some("sapling".to_string()),
            ismine: Some(false),
        })
    }

    async fn set_generate(&self, _generate: bool, _threads: u32) -> RpcResult<()> {
        self.record("setgenerate")?;
        Ok(())
    }

    async fn get_balance(&self) -> RpcResult<f64> {
        self.record("getbalance")?;
        self.balances.lock().unwrap().pop_front().unwrap_or(Ok(0.0))
    }

    async fn z_shield_coinbase(&self, _from: &str, _to: &str) -> RpcResult<ShieldResult> {
        self.record("z_shieldcoinbase")?;
        Ok(ShieldResult {
            remaining_utxos: 0,
            remaining_value: 0.0,
            shielding_utxos: 1,
            shielding_value: 256.0,
            opid: "opid-mock".to_string(),
        })
    }
}
