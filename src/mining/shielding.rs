//! Mining and coinbase shielding loop.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::time::sleep;

use crate::config::MiningConfig;
use crate::observability::metrics;
use crate::rpc::{NodeInfo, NodeRpc, RpcError, ShieldResult};

/// Errors that end the mining loop.
#[derive(Debug, Error)]
pub enum MiningError {
    /// Shielded address validation or `setgenerate` failed.
    #[error("mining setup failed: {0}")]
    Setup(#[source] RpcError),

    /// Any call inside an iteration failed.
    #[error("mining loop failed on iteration {iteration}: {source}")]
    Iteration {
        iteration: u64,
        #[source]
        source: RpcError,
    },
}

/// Why the loop stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Shutdown was signalled.
    Interrupted { iterations: u64 },
    /// `max_iterations` was reached.
    IterationLimit { iterations: u64 },
}

/// Outcome of a single iteration.
#[derive(Debug, Clone)]
pub struct Iteration {
    pub balance: f64,
    /// Set when funds were available and a shield call was issued.
    pub shielded: Option<ShieldResult>,
    pub info: NodeInfo,
}

/// Drives block generation and shields coinbase funds as they mature.
pub struct ShieldingLoop<'a, R> {
    rpc: &'a R,
    config: &'a MiningConfig,
    iterations: u64,
}

impl<'a, R: NodeRpc> ShieldingLoop<'a, R> {
    pub fn new(rpc: &'a R, config: &'a MiningConfig) -> Self {
        Self {
            rpc,
            config,
            iterations: 0,
        }
    }

    /// Completed iterations so far.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Validate the shielded destination and switch generation on.
    pub async fn prepare(&self) -> Result<(), MiningError> {
        let target = &self.config.shielded_address;
        let info = self
            .rpc
            .z_validate_address(target)
            .await
            .map_err(MiningError::Setup)?;
        if info.isvalid {
            tracing::info!(address = %target, kind = ?info.kind, "Shielded address validated");
        } else {
            tracing::warn!(address = %target, "Node reports shielded address as invalid");
        }

        tracing::info!(threads = self.config.generate_threads, "Starting mining");
        self.rpc
            .set_generate(true, self.config.generate_threads)
            .await
            .map_err(MiningError::Setup)
    }

    /// One balance / shield / status round.
    pub async fn tick(&mut self) -> Result<Iteration, MiningError> {
        let iteration = self.iterations + 1;
        let wrap = |source| MiningError::Iteration { iteration, source };

        let balance = self.rpc.get_balance().await.map_err(wrap)?;
        metrics::record_balance(balance);
        tracing::info!(balance, "Available balance");

        let shielded = if balance > 0.0 {
            let result = self
                .rpc
                .z_shield_coinbase(&self.config.shield_from, &self.config.shielded_address)
                .await
                .map_err(wrap)?;
            metrics::record_shield();
            tracing::info!(
                opid = %result.opid,
                shielding_utxos = result.shielding_utxos,
                shielding_value = result.shielding_value,
                "Shielding transaction submitted"
            );
            Some(result)
        } else {
            tracing::info!("No funds available to shield yet");
            None
        };

        let info = self.rpc.get_info().await.map_err(wrap)?;
        metrics::record_chain_status(&info);
        tracing::info!(
            blocks = info.blocks,
            connections = info.connections,
            "Chain status"
        );

        self.iterations = iteration;
        Ok(Iteration {
            balance,
            shielded,
            info,
        })
    }

    /// Loop until an iteration fails, the iteration limit is hit, or
    /// `shutdown` fires. A failed iteration is logged and ends the loop.
    pub async fn run(
        &mut self,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> Result<LoopExit, MiningError> {
        let interval = Duration::from_millis(self.config.interval_ms);

        loop {
            if let Err(e) = self.tick().await {
                tracing::error!(error = %e, "Mining loop stopped");
                return Err(e);
            }

            if let Some(max) = self.config.max_iterations {
                if self.iterations >= max {
                    tracing::info!(iterations = self.iterations, "Iteration limit reached");
                    return Ok(LoopExit::IterationLimit {
                        iterations: self.iterations,
                    });
                }
            }

            tokio::select! {
                _ = sleep(interval) => {}
                _ = shutdown.recv() => {
                    tracing::info!(
                        iterations = self.iterations,
                        "Mining loop received shutdown signal"
                    );
                    return Ok(LoopExit::Interrupted {
                        iterations: self.iterations,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Shutdown;
    use crate::rpc::mock::{transport_error, MockNode};

    fn fast_config(max_iterations: Option<u64>) -> MiningConfig {
        MiningConfig {
            interval_ms: 1,
            max_iterations,
            ..MiningConfig::default()
        }
    }

    #[tokio::test]
    async fn test_prepare_validates_then_generates() {
        let node = MockNode::new();
        let config = fast_config(None);
        ShieldingLoop::new(&node, &config).prepare().await.unwrap();
        assert_eq!(node.calls(), vec!["z_validateaddress", "setgenerate"]);
    }

    #[tokio::test]
    async fn test_invalid_shielded_address_still_mines() {
        let node = MockNode::new().with_zaddr_valid(false);
        let config = fast_config(Some(1));
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();

        let mut mining = ShieldingLoop::new(&node, &config);
        mining.prepare().await.unwrap();
        let exit = mining.run(&mut rx).await.unwrap();

        assert_eq!(exit, LoopExit::IterationLimit { iterations: 1 });
        assert_eq!(
            node.calls(),
            vec!["z_validateaddress", "setgenerate", "getbalance", "getinfo"]
        );
    }

    #[tokio::test]
    async fn test_setup_errors() {
        let config = fast_config(None);

        let node = MockNode::new().failing("z_validateaddress");
        let err = ShieldingLoop::new(&node, &config).prepare().await.unwrap_err();
        assert!(matches!(
            err,
            MiningError::Setup(RpcError::Transport { method: "z_validateaddress", .. })
        ));
        assert_eq!(node.calls(), vec!["z_validateaddress"]);

        let node = MockNode::new().failing("setgenerate");
        let err = ShieldingLoop::new(&node, &config).prepare().await.unwrap_err();
        assert!(matches!(
            err,
            MiningError::Setup(RpcError::Transport { method: "setgenerate", .. })
        ));
        assert_eq!(node.count("getbalance"), 0);
    }

    #[tokio::test]
    async fn test_shield_error_skips_status() {
        let node = MockNode::new()
            .with_balances(vec![Ok(25.0)])
            .failing("z_shieldcoinbase");
        let config = fast_config(None);
        let mut mining = ShieldingLoop::new(&node, &config);

        let err = mining.tick().await.unwrap_err();
        assert!(matches!(err, MiningError::Iteration { iteration: 1, .. }));
        assert_eq!(node.calls(), vec!["getbalance", "z_shieldcoinbase"]);
        assert_eq!(mining.iterations(), 0);
    }

    #[tokio::test]
    async fn test_zero_balance_skips_shielding() {
        let node = MockNode::new().with_balances(vec![Ok(0.0)]);
        let config = fast_config(None);
        let mut mining = ShieldingLoop::new(&node, &config);

        let iteration = mining.tick().await.unwrap();
        assert!(iteration.shielded.is_none());
        assert_eq!(node.count("z_shieldcoinbase"), 0);
        assert_eq!(node.calls(), vec!["getbalance", "getinfo"]);
    }

    #[tokio::test]
    async fn test_positive_balance_shields_once() {
        let node = MockNode::new().with_balances(vec![Ok(256.0)]);
        let config = fast_config(None);
        let mut mining = ShieldingLoop::new(&node, &config);

        let iteration = mining.tick().await.unwrap();
        assert_eq!(iteration.balance, 256.0);
        assert_eq!(iteration.shielded.map(|r| r.opid), Some("opid-mock".to_string()));
        assert_eq!(node.calls(), vec!["getbalance", "z_shieldcoinbase", "getinfo"]);
        assert_eq!(mining.iterations(), 1);
    }

    #[tokio::test]
    async fn test_balance_error_ends_loop_without_further_calls() {
        let node = MockNode::new().with_balances(vec![Err(transport_error("getbalance"))]);
        let config = fast_config(None);
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();

        let err = ShieldingLoop::new(&node, &config).run(&mut rx).await.unwrap_err();
        assert!(matches!(err, MiningError::Iteration { iteration: 1, .. }));
        assert_eq!(node.calls(), vec!["getbalance"]);
    }

    #[tokio::test]
    async fn test_iteration_limit() {
        let node = MockNode::new().with_balances(vec![Ok(0.0), Ok(12.5), Ok(0.0)]);
        let config = fast_config(Some(3));
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();

        let exit = ShieldingLoop::new(&node, &config).run(&mut rx).await.unwrap();
        assert_eq!(exit, LoopExit::IterationLimit { iterations: 3 });
        assert_eq!(node.count("getbalance"), 3);
        assert_eq!(node.count("z_shieldcoinbase"), 1);
        assert_eq!(node.count("getinfo"), 3);
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_sleep() {
        let node = MockNode::new();
        let config = MiningConfig {
            interval_ms: 60_000,
            ..MiningConfig::default()
        };
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        shutdown.trigger();

        let exit = ShieldingLoop::new(&node, &config).run(&mut rx).await.unwrap();
        assert_eq!(exit, LoopExit::Interrupted { iterations: 1 });
    }
}
