//! Exponential backoff with jitter.

use std::time::Duration;
use rand::Rng;

use crate::config::DatabaseConfig;

/// Delay schedule: `base * factor^(attempt-1)`, capped at `max`, plus up to 10% jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    pub base_ms: u64,
    pub factor: u32,
    pub max_ms: u64,
}

impl BackoffPolicy {
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            base_ms: config.retry_base_delay_ms,
            factor: config.retry_backoff_factor,
            max_ms: config.retry_max_delay_ms,
        }
    }

    /// Delay before retry number `attempt` (1-based). Attempt 0 waits nothing.
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let growth = u64::from(self.factor.max(1)).saturating_pow(attempt - 1);
        let capped = self.base_ms.saturating_mul(growth).min(self.max_ms);

        let jitter_range = capped / 10;
        let jitter = if jitter_range > 0 {
            rand::thread_rng().gen_range(0..jitter_range)
        } else {
            0
        };

        Duration::from_millis(capped + jitter)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base_ms: 1_000,
            factor: 2,
            max_ms: 30_000,
        }
    }
}
