//! Retry loop: run a closure until success or the attempt budget is spent.

use std::fmt;

use super::backoff::BackoffSpec;
use super::error::ExhaustedRetries;

/// Runs `f` up to `max_retries + 1` times, sleeping per `backoff` between
/// attempts. `max_retries = 0` means exactly one attempt. The sleep happens
/// only between attempts, never after the final failure, so a caller that
/// gives up is not charged a pointless wait.
pub fn call_with_retry<O, E, F>(
    mut f: F,
    max_retries: u32,
    backoff: &BackoffSpec,
) -> Result<O, ExhaustedRetries<E>>
where
    F: FnMut() -> Result<O, E>,
    E: fmt::Display,
{
    let total_attempts = max_retries.saturating_add(1);
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => {
                if attempt >= total_attempts {
                    tracing::warn!(attempts = total_attempts, error = %e, "retries exhausted");
                    return Err(ExhaustedRetries { attempts: total_attempts, last: e });
                }
                let wait = backoff.wait_duration();
                tracing::warn!(
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    error = %e,
                    "attempt failed, backing off before retry"
                );
                std::thread::sleep(wait);
                attempt += 1;
            }
        }
    }
}
