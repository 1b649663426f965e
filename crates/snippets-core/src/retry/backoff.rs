//! Backoff wait specification: a fixed duration or a uniformly sampled range.

use rand::Rng;
use std::time::Duration;
use thiserror::Error;

/// How long to wait between retry attempts.
///
/// `Fixed` always waits the same duration; `Range` draws a fresh value
/// uniformly from `[min, max]` (inclusive) per attempt, using the
/// process-seeded thread RNG. Not cryptographic, and not meant to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffSpec {
    /// Wait exactly this long between attempts.
    Fixed(Duration),
    /// Wait a random duration in `[min, max]` per attempt. Invariant: `min <= max`.
    Range { min: Duration, max: Duration },
}

/// Returned by [`BackoffSpec::range`] when `min > max`.
#[derive(Debug, Error)]
#[error("invalid backoff range: min {min:?} exceeds max {max:?}")]
pub struct InvalidBackoffRange {
    pub min: Duration,
    pub max: Duration,
}

impl Default for BackoffSpec {
    fn default() -> Self {
        Self::Fixed(Duration::from_millis(500))
    }
}

impl BackoffSpec {
    /// Fixed wait between attempts.
    pub fn fixed(wait: Duration) -> Self {
        Self::Fixed(wait)
    }

    /// Jittered wait drawn from `[min, max]`. Fails when `min > max`.
    pub fn range(min: Duration, max: Duration) -> Result<Self, InvalidBackoffRange> {
        if min > max {
            return Err(InvalidBackoffRange { min, max });
        }
        Ok(Self::Range { min, max })
    }

    /// Compute the wait for one retry attempt.
    pub fn wait_duration(&self) -> Duration {
        match *self {
            Self::Fixed(wait) => wait,
            Self::Range { min, max } => {
                if min == max {
                    return min;
                }
                rand::thread_rng().gen_range(min..=max)
            }
        }
    }
}
