//! Completion progress shared across workers.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Monotonic completed-item counter with an optional known total. Shared by
/// all workers of one run; updated with one atomic increment per completed
/// item regardless of success or failure.
#[derive(Debug)]
pub struct ProgressState {
    completed: AtomicUsize,
    total: Option<usize>,
}

impl ProgressState {
    /// `total` is `None` when the input sequence has no known length.
    pub fn new(total: Option<usize>) -> Self {
        Self { completed: AtomicUsize::new(0), total }
    }

    /// Records one completed item and returns the snapshot after it.
    pub fn complete(&self) -> PoolProgress {
        let completed = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        PoolProgress { completed, total: self.total }
    }

    /// Current snapshot without recording anything.
    pub fn snapshot(&self) -> PoolProgress {
        PoolProgress {
            completed: self.completed.load(Ordering::Relaxed),
            total: self.total,
        }
    }
}

/// One progress observation, CLI-friendly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolProgress {
    /// Items completed so far (success or failure).
    pub completed: usize,
    /// Total item count, if known up front.
    pub total: Option<usize>,
}

impl PoolProgress {
    /// Fraction complete in `[0.0, 1.0]`, or `None` when the total is unknown.
    pub fn fraction(&self) -> Option<f64> {
        let total = self.total?;
        if total == 0 {
            return Some(1.0);
        }
        Some((self.completed as f64 / total as f64).min(1.0))
    }

    /// True once every item of a known total has completed.
    pub fn is_done(&self) -> bool {
        self.total.is_some_and(|t| self.completed >= t)
    }
}

impl fmt::Display for PoolProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.total {
            Some(total) => write!(f, "{}/{}", self.completed, total),
            None => write!(f, "{}", self.completed),
        }
    }
}
