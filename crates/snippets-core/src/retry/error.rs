//! Error surfaced when every retry attempt has failed.

use std::fmt;

/// All attempts failed; carries the total attempt count and the last error.
#[derive(Debug)]
pub struct ExhaustedRetries<E> {
    /// Total attempts made (`max_retries + 1`).
    pub attempts: u32,
    /// The error from the final attempt.
    pub last: E,
}

impl<E: fmt::Display> fmt::Display for ExhaustedRetries<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all {} attempts failed, last error: {}", self.attempts, self.last)
    }
}

impl<E: fmt::Display + fmt::Debug> std::error::Error for ExhaustedRetries<E> {}
