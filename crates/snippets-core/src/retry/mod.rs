//! Retry with backoff.
//!
//! This module encapsulates the wait policy (fixed or jittered) and the
//! bounded retry loop so that higher layers (worker pool, perf runner) can
//! wrap any fallible call with a consistent policy.

mod backoff;
mod error;
mod run;

pub use backoff::{BackoffSpec, InvalidBackoffRange};
pub use error::ExhaustedRetries;
pub use run::call_with_retry;
