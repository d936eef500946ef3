//! Daemon process launcher.
//!
//! # Responsibilities
//! - Build the daemon command line for the bootstrap and final launches
//! - Run the launch command and check its exit status
//! - Give the daemon time to start before RPC traffic begins
//!
//! The daemon forks into the background (`-daemon`), so the launch command
//! returns promptly and no child handle is kept.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::sleep;

use crate::config::{ChainConfig, RunnerConfig};
use crate::node::types::LaunchError;

/// Which of the two launches is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchPhase<'a> {
    /// First start, used to mint an address and public key.
    Bootstrap,
    /// Restart bound to the derived public key.
    Final { pubkey: &'a str },
}

impl LaunchPhase<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            LaunchPhase::Bootstrap => "bootstrap",
            LaunchPhase::Final { .. } => "final",
        }
    }
}

/// Launches the daemon binary with the chain's fixed flag set.
#[derive(Debug, Clone)]
pub struct Launcher {
    binary: String,
    chain: ChainConfig,
    rpc_port: u16,
    node_dir: PathBuf,
    conf_path: PathBuf,
    startup_delay: Duration,
}

impl Launcher {
    pub fn new(config: &RunnerConfig, conf_path: PathBuf) -> Self {
        Self {
            binary: config.node.daemon_bin.clone(),
            chain: config.chain.clone(),
            rpc_port: config.rpc.port,
            node_dir: PathBuf::from(&config.node.node_dir),
            conf_path,
            startup_delay: Duration::from_millis(config.node.startup_delay_ms),
        }
    }

    /// Command-line arguments for `phase`, without the binary itself.
    ///
    /// Both launches carry the full flag set; the final one adds `-pubkey`.
    pub fn args(&self, phase: LaunchPhase<'_>) -> Vec<String> {
        let chain = &self.chain;
        let mut args = vec![
            format!("-ac_name={}", chain.name),
            format!("-ac_cc={}", chain.cc),
            format!("-ac_sapling={}", chain.sapling),
            format!("-ac_supply={}", chain.supply),
            format!("-ac_reward={}", chain.reward),
            format!("-ac_halving={}", chain.halving),
            format!("-ac_private={}", chain.private),
            format!("-ac_cbmaturity={}", chain.cbmaturity),
            format!("-ac_blocktime={}", chain.blocktime),
            format!("-conf={}", self.conf_path.display()),
            format!("-rpcport={}", self.rpc_port),
            format!("-port={}", chain.p2p_port),
            format!("-datadir={}", self.node_dir.display()),
        ];
        if chain.testnode {
            args.push("-testnode=1".to_string());
        }
        if !chain.whitelist.is_empty() {
            args.push(format!("-whitelist={}", chain.whitelist));
        }
        args.extend(chain.extra_args.iter().cloned());
        if let LaunchPhase::Final { pubkey } = phase {
            args.push(format!("-pubkey={}", pubkey));
        }
        args.push("-daemon".to_string());
        args
    }

    /// Run the launch command, fail on a non-zero exit, then wait for startup.
    pub async fn launch(&self, phase: LaunchPhase<'_>) -> Result<(), LaunchError> {
        let args = self.args(phase);
        tracing::debug!(binary = %self.binary, ?args, "Launching daemon");

        let status = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|source| LaunchError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if !status.success() {
            return Err(LaunchError::ExitStatus {
                binary: self.binary.clone(),
                phase: phase.label(),
                status: status.to_string(),
            });
        }

        tracing::info!(
            phase = phase.label(),
            chain = %self.chain.name,
            startup_delay_ms = self.startup_delay.as_millis() as u64,
            "Started node"
        );
        sleep(self.startup_delay).await;
        Ok(())
    }
}
