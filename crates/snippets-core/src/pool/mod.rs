//! Bounded worker pool for batch execution.
//!
//! A fixed set of worker threads consumes a shared work queue and applies a
//! caller-supplied unit function to each item. The eager [`WorkerPool::run`]
//! restores input order before returning; the lazy [`WorkerPool::run_iter`]
//! yields results in completion order as they arrive. Per-item failures
//! either abort the run or are logged and dropped, per [`FaultPolicy`].

mod iter;
mod progress;
mod run;

pub use iter::PoolIter;
pub use progress::{PoolProgress, ProgressState};

use std::fmt;
use std::sync::mpsc;

/// What to do when the unit function fails for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultPolicy {
    /// Surface the first failure and stop handing out new work. Items already
    /// dispatched finish, but their results are discarded.
    Propagate,
    /// Log a warning and drop the item from the output. The run never fails.
    SuppressAndSkip,
}

/// Error returned by an eager pool run under [`FaultPolicy::Propagate`].
#[derive(Debug)]
pub enum PoolError<E> {
    /// The unit function failed for the item at this ordinal index.
    Item { index: usize, source: E },
    /// A worker thread died before delivering a result.
    WorkerLost,
}

impl<E: fmt::Display> fmt::Display for PoolError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::Item { index, source } => write!(f, "item {}: {}", index, source),
            PoolError::WorkerLost => write!(f, "worker thread exited before returning a result"),
        }
    }
}

impl<E: fmt::Display + fmt::Debug> std::error::Error for PoolError<E> {}

/// A worker pool of fixed size. Threads live only for the duration of one
/// `run`/`run_iter` call; nothing is shared between runs.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Creates a pool with `workers` concurrent slots (clamped to at least 1).
    pub fn new(workers: usize) -> Self {
        Self { workers: workers.max(1) }
    }

    /// Concurrency ceiling for one run.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Applies `f` to every item and returns the outputs in input order.
    ///
    /// Under `Propagate` the output length equals the input length and the
    /// first failure aborts the run. Under `SuppressAndSkip` failed items are
    /// absent from the output (no placeholder), so the length may be shorter.
    /// Progress snapshots (one per completed item, success or failure) go to
    /// `progress_tx` when provided. All worker threads are joined before this
    /// returns, on success and failure paths alike.
    pub fn run<I, O, E, F>(
        &self,
        items: Vec<I>,
        f: F,
        fault_policy: FaultPolicy,
        progress_tx: Option<&mpsc::Sender<PoolProgress>>,
    ) -> Result<Vec<O>, PoolError<E>>
    where
        I: Send,
        O: Send,
        E: Send + fmt::Display,
        F: Fn(I) -> Result<O, E> + Sync,
    {
        run::run_bounded(self.workers, items, &f, fault_policy, progress_tx)
    }

    /// Applies `f` to every item of a possibly unbounded source, yielding
    /// results in completion order as they become available.
    ///
    /// The returned iterator yields `Ok` outputs; under `Propagate` it yields
    /// the first failure as `Err` and then ends, under `SuppressAndSkip` it
    /// never yields `Err`. Worker threads are joined when the iterator is
    /// exhausted or dropped.
    pub fn run_iter<I, O, E, F, It>(
        &self,
        items: It,
        f: F,
        fault_policy: FaultPolicy,
        progress_tx: Option<mpsc::Sender<PoolProgress>>,
    ) -> PoolIter<O, E>
    where
        It: Iterator<Item = I> + Send + 'static,
        I: Send + 'static,
        O: Send + 'static,
        E: Send + fmt::Display + 'static,
        F: Fn(I) -> Result<O, E> + Send + Sync + 'static,
    {
        iter::spawn(self.workers, items, f, fault_policy, progress_tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_workers_clamped_to_one() {
        assert_eq!(WorkerPool::new(0).workers(), 1);
        assert_eq!(WorkerPool::new(8).workers(), 8);
    }

    #[test]
    fn pool_error_display() {
        let e: PoolError<String> = PoolError::Item { index: 7, source: "boom".to_string() };
        assert_eq!(e.to_string(), "item 7: boom");
        let lost: PoolError<String> = PoolError::WorkerLost;
        assert!(lost.to_string().contains("worker thread"));
    }
}
