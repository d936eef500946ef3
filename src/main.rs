//! ZOMBIE chain runner.
//!
//! Provisions a `komodod` test chain, mints a pubkey on a bootstrap
//! instance, restarts the node bound to it, then mines and shields
//! coinbase funds until interrupted or a call fails.
//!
//! # Architecture Overview
//!
//! ```text
//!   RunnerConfig ──▶ node::conf ──▶ <node_dir>/<chain>.conf
//!        │
//!        ├──▶ node::launcher ──▶ komodod -daemon (bootstrap)
//!        │         │
//!        │         ▼
//!        ├──▶ resilience::readiness ◀──── rpc::client (getinfo)
//!        │         │
//!        │         ▼
//!        ├──▶ node::bootstrap (getnewaddress → validateaddress → stop)
//!        │         │
//!        │         ▼
//!        ├──▶ node::launcher ──▶ komodod -pubkey=… -daemon (final)
//!        │         │
//!        │         ▼
//!        └──▶ mining::shielding (getbalance → z_shieldcoinbase → getinfo)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use zombie_runner::config::{apply_env_overrides, read_config, validate_config, ConfigError};
use zombie_runner::lifecycle::signals::listen_for_interrupt;
use zombie_runner::observability::{logging, metrics};
use zombie_runner::{Harness, HarnessError, RunnerConfig, Shutdown};

#[derive(Parser)]
#[command(name = "zombie-runner")]
#[command(about = "Provision a ZOMBIE test chain node and keep it mining", long_about = None)]
struct Cli {
    /// Runner config file (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Node directory holding the conf file and chain data.
    #[arg(long)]
    node_dir: Option<String>,

    /// Asset chain name.
    #[arg(long)]
    chain: Option<String>,

    /// Daemon binary.
    #[arg(long)]
    daemon_bin: Option<String>,

    /// RPC port; takes precedence over COIN_RPC_PORT.
    #[arg(long)]
    rpc_port: Option<u16>,

    /// Stop mining after this many iterations.
    #[arg(long)]
    max_iterations: Option<u64>,

    /// Serve Prometheus metrics on this address.
    #[arg(long)]
    metrics_address: Option<SocketAddr>,
}

impl Cli {
    fn apply(&self, config: &mut RunnerConfig) {
        if let Some(dir) = &self.node_dir {
            config.node.node_dir = dir.clone();
        }
        if let Some(chain) = &self.chain {
            config.chain.name = chain.clone();
        }
        if let Some(bin) = &self.daemon_bin {
            config.node.daemon_bin = bin.clone();
        }
        if let Some(port) = self.rpc_port {
            config.rpc.port = port;
        }
        if let Some(max) = self.max_iterations {
            config.mining.max_iterations = Some(max);
        }
        if let Some(addr) = self.metrics_address {
            config.observability.metrics_address = Some(addr);
        }
    }

    fn resolve(&self) -> Result<RunnerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => RunnerConfig::default(),
        };
        apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        self.apply(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), HarnessError> {
    let cli = Cli::parse();
    let config = cli.resolve()?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!("zombie-runner v0.1.0 starting");
    tracing::info!(
        chain = %config.chain.name,
        node_dir = %config.node.node_dir,
        rpc_port = config.rpc.port,
        daemon_bin = %config.node.daemon_bin,
        "Configuration loaded"
    );

    if let Some(addr) = config.observability.metrics_address {
        metrics::init_metrics(addr);
    }

    let shutdown = Shutdown::new();
    listen_for_interrupt(shutdown.clone());

    let mut harness = Harness::new(config)?;
    let exit = harness.run(&shutdown).await?;

    tracing::info!(?exit, "Run complete");
    Ok(())
}
