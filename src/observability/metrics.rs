//! Metrics collection and exposition.
//!
//! # Metrics
//! - `zombie_rpc_calls_total` (counter): RPC calls by method
//! - `zombie_rpc_errors_total` (counter): failed RPC calls by method
//! - `zombie_readiness_attempts_total` (counter): status probes while waiting
//! - `zombie_block_height` (gauge): last reported block height
//! - `zombie_peer_connections` (gauge): last reported peer count
//! - `zombie_wallet_balance` (gauge): last transparent balance
//! - `zombie_shield_operations_total` (counter): shield calls issued
//!
//! Recording is a no-op until an exporter is installed.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::rpc::NodeInfo;

/// Install the Prometheus exporter on `addr`.
///
/// Must be called from inside the tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_rpc_call(method: &'static str) {
    metrics::counter!("zombie_rpc_calls_total", "method" => method).increment(1);
}

pub fn record_rpc_error(method: &'static str) {
    metrics::counter!("zombie_rpc_errors_total", "method" => method).increment(1);
}

pub fn record_readiness_attempt() {
    metrics::counter!("zombie_readiness_attempts_total").increment(1);
}

pub fn record_chain_status(info: &NodeInfo) {
    metrics::gauge!("zombie_block_height").set(info.blocks as f64);
    metrics::gauge!("zombie_peer_connections").set(info.connections as f64);
}

pub fn record_balance(balance: f64) {
    metrics::gauge!("zombie_wallet_balance").set(balance);
}

pub fn record_shield() {
    metrics::counter!("zombie_shield_operations_total").increment(1);
}
