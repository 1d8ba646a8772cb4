//! Bounded retry loop for startup operations.

use std::fmt::Display;
use std::future::Future;

use super::backoff::BackoffPolicy;

/// Run `op` up to `max_attempts` times (at least once), sleeping per `policy`
/// between failures. Returns the last error when every attempt fails.
pub async fn retry<T, E, F, Fut>(
    what: &str,
    max_attempts: u32,
    policy: &BackoffPolicy,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(operation = what, attempt, "Succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if attempt < max_attempts => {
                let delay = policy.delay(attempt);
                tracing::warn!(
                    operation = what,
                    attempt,
                    max_attempts,
                    delay = ?delay,
                    error = %e,
                    "Attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                tracing::error!(operation = what, attempt, error = %e, "Giving up");
                return Err(e);
            }
        }
    }
}
