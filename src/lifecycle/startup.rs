//! Run orchestration.
//!
//! # Phases
//! ```text
//! Configuring → LaunchingBootstrap → AwaitingRpc → DerivingKey → Stopping
//!     → LaunchingFinal → AwaitingRpc → MiningLoop → Terminated
//! ```
//!
//! # Design Decisions
//! - Fail fast: any error outside readiness polling is fatal
//! - Phases run strictly in order; each depends on the previous one
//! - An interrupt ends a launch, readiness wait or stop settle at once;
//!   the mining loop observes it between iterations

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;

use crate::config::{ConfigError, RunnerConfig};
use crate::lifecycle::Shutdown;
use crate::mining::{LoopExit, MiningError, ShieldingLoop};
use crate::node::{
    derive_identity, stop_node, write_conf, BootstrapError, ConfWriteError, LaunchError,
    LaunchPhase, Launcher,
};
use crate::resilience::{wait_for_rpc, ReadinessError};
use crate::rpc::{NodeRpc, RpcClient, RpcError};

/// Where the run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configuring,
    LaunchingBootstrap,
    AwaitingRpc,
    DerivingKey,
    Stopping,
    LaunchingFinal,
    MiningLoop,
    Terminated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Configuring => "configuring",
            Phase::LaunchingBootstrap => "launching_bootstrap",
            Phase::AwaitingRpc => "awaiting_rpc",
            Phase::DerivingKey => "deriving_key",
            Phase::Stopping => "stopping",
            Phase::LaunchingFinal => "launching_final",
            Phase::MiningLoop => "mining_loop",
            Phase::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Any error that ends a run.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    ConfWrite(#[from] ConfWriteError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Readiness(#[from] ReadinessError),

    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error(transparent)]
    Mining(#[from] MiningError),

    /// Shutdown was signalled before the mining loop started.
    #[error("interrupted while {phase}")]
    Interrupted { phase: Phase },
}

/// Provisions the node and drives it through every phase.
pub struct Harness {
    config: RunnerConfig,
    rpc: RpcClient,
    phase: Phase,
}

impl Harness {
    pub fn new(config: RunnerConfig) -> Result<Self, HarnessError> {
        let rpc = RpcClient::new(&config.rpc)?;
        tracing::debug!(endpoint = %rpc.endpoint(), "RPC client configured");
        Ok(Self {
            config,
            rpc,
            phase: Phase::Configuring,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run every phase. Returns how the mining loop stopped.
    ///
    /// The harness is left in [`Phase::Terminated`] whatever the outcome.
    pub async fn run(&mut self, shutdown: &Shutdown) -> Result<LoopExit, HarnessError> {
        let result = self.drive(shutdown).await;
        if let Err(e) = &result {
            tracing::error!(phase = %self.phase, error = %e, "Run failed");
        }
        self.enter(Phase::Terminated);
        result
    }

    async fn drive(&mut self, shutdown: &Shutdown) -> Result<LoopExit, HarnessError> {
        let mut interrupt = shutdown.subscribe();

        let node_dir = PathBuf::from(&self.config.node.node_dir);
        let conf_path = write_conf(&node_dir, &self.config.chain.name, &self.config.rpc)?;
        let launcher = Launcher::new(&self.config, conf_path);

        self.enter(Phase::LaunchingBootstrap);
        let step = launcher.launch(LaunchPhase::Bootstrap);
        until_interrupted(self.phase, &mut interrupt, step).await?;

        self.enter(Phase::AwaitingRpc);
        let step = wait_for_rpc(&self.rpc, &self.config.readiness);
        until_interrupted(self.phase, &mut interrupt, step).await?;

        self.enter(Phase::DerivingKey);
        let step = derive_identity(&self.rpc);
        let identity = until_interrupted(self.phase, &mut interrupt, step).await?;

        self.enter(Phase::Stopping);
        let settle = Duration::from_millis(self.config.node.stop_delay_ms);
        until_interrupted(self.phase, &mut interrupt, stop_node(&self.rpc, settle)).await?;

        self.enter(Phase::LaunchingFinal);
        let step = launcher.launch(LaunchPhase::Final {
            pubkey: &identity.pubkey,
        });
        until_interrupted(self.phase, &mut interrupt, step).await?;

        self.enter(Phase::AwaitingRpc);
        let step = wait_for_rpc(&self.rpc, &self.config.readiness);
        until_interrupted(self.phase, &mut interrupt, step).await?;

        self.enter(Phase::MiningLoop);
        let mut mining = ShieldingLoop::new(&self.rpc, &self.config.mining);
        let prepared = until_interrupted(self.phase, &mut interrupt, mining.prepare()).await;
        let outcome = match prepared {
            Ok(()) => mining.run(&mut interrupt).await.map_err(HarnessError::from),
            Err(e) => Err(e),
        };

        if self.config.mining.stop_node_on_exit {
            self.stop_on_exit().await;
        }

        outcome
    }

    async fn stop_on_exit(&self) {
        match self.rpc.stop().await {
            Ok(response) => tracing::info!(%response, "Node stopped on exit"),
            Err(e) => tracing::warn!(error = %e, "Failed to stop node on exit"),
        }
    }

    fn enter(&mut self, next: Phase) {
        tracing::info!(from = %self.phase, to = %next, "Phase transition");
        self.phase = next;
    }
}

/// Await `step` unless shutdown fires first.
async fn until_interrupted<T, E>(
    phase: Phase,
    interrupt: &mut broadcast::Receiver<()>,
    step: impl Future<Output = Result<T, E>>,
) -> Result<T, HarnessError>
where
    HarnessError: From<E>,
{
    tokio::select! {
        result = step => Ok(result?),
        _ = interrupt.recv() => {
            tracing::warn!(%phase, "Interrupted");
            Err(HarnessError::Interrupted { phase })
        }
    }
}
