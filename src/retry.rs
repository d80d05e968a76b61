//! Bounded retry with exponential backoff.
//!
//! Bootstrap steps and connection acquisition are wrapped in
//! [`with_retries`]. This handles transient connection issues when services
//! are starting up, e.g. when the database container is still coming up.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Retry schedule: up to `max_attempts` attempts, waiting
/// `base_delay * 2^(attempt-1)` between them.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Run `op` until it succeeds or the policy is exhausted.
///
/// Each failed attempt is logged at warn; exhaustion is logged at error and
/// the final failure is returned to the caller. The wrapped operation is
/// treated as atomic: there are no partial-success semantics.
pub async fn with_retries<T, E, F, Fut>(
    what: &str,
    policy: &RetryPolicy,
    mut op: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut last_error = None;

    for attempt in 1..=policy.max_attempts {
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!("{} succeeded after {} attempts", what, attempt);
                }
                return Ok(value);
            }
            Err(e) => {
                if attempt < policy.max_attempts {
                    let delay = policy.delay_after(attempt);
                    tracing::warn!(
                        "{} failed (attempt {}/{}): {}. Retrying in {:?}...",
                        what,
                        attempt,
                        policy.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                last_error = Some(e);
            }
        }
    }

    let e = last_error.expect("max_attempts is at least 1");
    tracing::error!(
        "{} failed after {} attempts: {}",
        what,
        policy.max_attempts,
        e
    );
    Err(e)
}
