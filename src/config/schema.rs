//! Configuration schema definitions.
//!
//! Defaults reproduce the fixed values the ZOMBIE test chain is provisioned
//! with, so an empty config file (or none at all) yields a working run.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Default shielded destination for coinbase funds.
pub const DEFAULT_SHIELDED_ADDRESS: &str =
    "zs10hvyxf3ajm82e4gvxem3zjlf9xf3yxhjww9fvz3mfqza9zwumvluzy735e29c3x5aj2nu0ua6n0";

/// Environment variable selecting the daemon RPC port.
pub const RPC_PORT_ENV: &str = "COIN_RPC_PORT";

/// Root configuration for the runner.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RunnerConfig {
    /// Daemon binary and on-disk layout.
    pub node: NodeConfig,

    /// Asset chain parameters passed on the daemon command line.
    pub chain: ChainConfig,

    /// RPC credentials and bind settings.
    pub rpc: RpcConfig,

    /// Readiness polling bounds.
    pub readiness: ReadinessConfig,

    /// Mining and shielding loop settings.
    pub mining: MiningConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Daemon process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Daemon binary, resolved on `PATH` when not absolute.
    pub daemon_bin: String,

    /// Node directory holding the conf file and chain data.
    pub node_dir: String,

    /// Delay after each launch before talking to the daemon, in milliseconds.
    pub startup_delay_ms: u64,

    /// Delay after the `stop` call before relaunching, in milliseconds.
    pub stop_delay_ms: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            daemon_bin: "komodod".to_string(),
            node_dir: "/data/node_0".to_string(),
            startup_delay_ms: 5_000,
            stop_delay_ms: 10_000,
        }
    }
}

/// Asset chain parameters (`-ac_*` flags and friends).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Chain name; also names the conf file.
    pub name: String,
    pub cc: u32,
    pub sapling: u32,
    pub supply: u64,
    pub reward: u64,
    pub halving: u64,
    pub private: u32,
    pub cbmaturity: u32,
    pub blocktime: u32,

    /// P2P listen port.
    pub p2p_port: u16,

    /// Run as a test node (`-testnode=1`).
    pub testnode: bool,

    /// Peer whitelist.
    pub whitelist: String,

    /// Extra flags appended before `-daemon` on both launches.
    pub extra_args: Vec<String>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            name: "ZOMBIE".to_string(),
            cc: 2,
            sapling: 1,
            supply: 0,
            reward: 25_600_000_000,
            halving: 388_885,
            private: 1,
            cbmaturity: 1,
            blocktime: 10,
            p2p_port: 6000,
            testnode: true,
            whitelist: "127.0.0.1".to_string(),
            extra_args: Vec::new(),
        }
    }
}

/// RPC configuration, shared by the conf writer and the client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Host the client connects to.
    pub host: String,

    /// RPC port (overridden by `COIN_RPC_PORT`).
    pub port: u16,

    pub user: String,
    pub password: String,

    /// `rpcbind` written to the daemon conf.
    pub bind: String,

    /// `rpcallowip` written to the daemon conf.
    pub allow_ip: String,

    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7000,
            user: "test".to_string(),
            password: "test".to_string(),
            bind: "0.0.0.0".to_string(),
            allow_ip: "0.0.0.0/0".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Readiness polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Maximum number of status calls before giving up.
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds.
    pub interval_ms: u64,

    /// Upper bound for exponential backoff. Equal to `interval_ms` means a
    /// fixed interval.
    pub max_interval_ms: u64,

    /// Total time allowed for the node to become reachable, in seconds.
    pub timeout_secs: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            max_attempts: 90,
            interval_ms: 2_000,
            max_interval_ms: 2_000,
            timeout_secs: 180,
        }
    }
}

/// Mining and shielding loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Destination for shielded coinbase funds.
    pub shielded_address: String,

    /// Source selector for `z_shieldcoinbase` (`*` = every transparent address).
    pub shield_from: String,

    /// Thread count passed to `setgenerate`.
    pub generate_threads: u32,

    /// Pause between loop iterations in milliseconds.
    pub interval_ms: u64,

    /// Stop after this many iterations. Unset runs until interrupted or failed.
    pub max_iterations: Option<u64>,

    /// Issue `stop` to the daemon when the loop exits.
    pub stop_node_on_exit: bool,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            shielded_address: DEFAULT_SHIELDED_ADDRESS.to_string(),
            shield_from: "*".to_string(),
            generate_threads: 1,
            interval_ms: 5_000,
            max_iterations: None,
            stop_node_on_exit: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Prometheus exporter bind address. Unset disables the exporter.
    pub metrics_address: Option<SocketAddr>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "zombie_runner=info".to_string(),
            metrics_address: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_zombie_chain() {
        let config = RunnerConfig::default();
        assert_eq!(config.rpc.port, 7000);
        assert_eq!(config.rpc.user, "test");
        assert_eq!(config.chain.name, "ZOMBIE");
        assert_eq!(config.chain.reward, 25_600_000_000);
        assert_eq!(config.readiness.interval_ms, 2_000);
        assert_eq!(config.mining.interval_ms, 5_000);
        assert!(config.mining.max_iterations.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RunnerConfig = toml::from_str(
            r#"
            [rpc]
            port = 7100

            [mining]
            max_iterations = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.rpc.port, 7100);
        assert_eq!(config.rpc.password, "test");
        assert_eq!(config.mining.max_iterations, Some(3));
        assert_eq!(config.mining.shielded_address, DEFAULT_SHIELDED_ADDRESS);
        assert_eq!(config.node.daemon_bin, "komodod");
    }

    #[test]
    fn test_metrics_address_is_parsed() {
        let config: RunnerConfig =
            toml::from_str("[observability]\nmetrics_address = \"127.0.0.1:9464\"\n").unwrap();
        assert_eq!(
            config.observability.metrics_address,
            Some("127.0.0.1:9464".parse().unwrap())
        );

        let bad =
            toml::from_str::<RunnerConfig>("[observability]\nmetrics_address = \"nowhere\"\n");
        assert!(bad.is_err());
    }
}
