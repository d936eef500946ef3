//! Readiness polling.
//!
//! # Responsibilities
//! - Probe the node with `getinfo` until it answers
//! - Bound the wait by attempt count and total time
//! - Report why waiting stopped when the bound is hit

use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::time::{sleep, timeout};

use crate::config::ReadinessConfig;
use crate::observability::metrics;
use crate::resilience::backoff::readiness_delay;
use crate::rpc::{NodeInfo, NodeRpc};

/// The node answered.
#[derive(Debug, Clone)]
pub struct Ready {
    /// Status payload of the successful probe.
    pub info: NodeInfo,
    /// Probes issued, including the successful one.
    pub attempts: u32,
    pub elapsed: Duration,
}

/// The node never answered within the configured bounds.
#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error("node RPC not ready after {attempts} attempts (last error: {last_error})")]
    Exhausted { attempts: u32, last_error: String },

    #[error("node RPC not ready within {}s ({attempts} attempts)", .elapsed.as_secs())]
    TimedOut { elapsed: Duration, attempts: u32 },
}

/// Poll `get_info` until it succeeds or the bounds are exceeded.
pub async fn wait_for_rpc<R: NodeRpc>(
    rpc: &R,
    config: &ReadinessConfig,
) -> Result<Ready, ReadinessError> {
    let started = Instant::now();
    let deadline = Duration::from_secs(config.timeout_secs);
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        metrics::record_readiness_attempt();

        let remaining = deadline.saturating_sub(started.elapsed());
        let failure = match timeout(remaining, rpc.get_info()).await {
            Ok(Ok(info)) => {
                tracing::info!(
                    attempts,
                    blocks = info.blocks,
                    connections = info.connections,
                    "Node ready"
                );
                return Ok(Ready {
                    info,
                    attempts,
                    elapsed: started.elapsed(),
                });
            }
            Ok(Err(e)) => e,
            Err(_) => {
                return Err(ReadinessError::TimedOut {
                    elapsed: started.elapsed(),
                    attempts,
                })
            }
        };

        if attempts >= config.max_attempts {
            return Err(ReadinessError::Exhausted {
                attempts,
                last_error: failure.to_string(),
            });
        }

        let delay = readiness_delay(config, attempts);
        if started.elapsed() + delay >= deadline {
            return Err(ReadinessError::TimedOut {
                elapsed: started.elapsed(),
                attempts,
            });
        }

        let retry_in_ms = delay.as_millis() as u64;
        if failure.is_unreachable() {
            tracing::warn!(
                attempt = attempts,
                retry_in_ms,
                error = %failure,
                "Waiting for node to start RPC"
            );
        } else {
            // Listening but still loading (e.g. -28 while the block index is read).
            tracing::warn!(
                attempt = attempts,
                retry_in_ms,
                error = %failure,
                "Node RPC answering but not ready"
            );
        }
        sleep(delay).await;
    }
}
