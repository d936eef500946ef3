//! Retry delays: fixed, or exponential with jitter.

use std::time::Duration;
use rand::Rng;

use crate::config::ReadinessConfig;

/// Calculate exponential backoff delay with jitter.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

/// Delay to wait after failed attempt number `attempt` (1-based).
///
/// A config whose ceiling equals its interval polls at a fixed cadence.
pub fn readiness_delay(config: &ReadinessConfig, attempt: u32) -> Duration {
    if config.max_interval_ms <= config.interval_ms {
        Duration::from_millis(config.interval_ms)
    } else {
        calculate_backoff(attempt, config.interval_ms, config.max_interval_ms)
    }
}
