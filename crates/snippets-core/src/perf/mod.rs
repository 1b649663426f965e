//! Perf runner: batch a unit call over a worker pool and aggregate timing.
//!
//! Drives the pool eagerly under `Propagate` (a failure aborts the whole
//! run; this is for controlled measurement, not resilient batch processing)
//! and reports throughput over the run's wall-clock time plus mean per-item
//! latency.

mod http;

pub use http::{call_service, post_json, HttpCallError};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::mpsc;
use std::time::Instant;
use thiserror::Error;

use crate::pool::{FaultPolicy, PoolProgress, WorkerPool};

/// One tested item: what was sent, what came back, and how long it took.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    /// The input record as read from the data source.
    pub item: Value,
    /// The request body actually sent.
    pub request: Value,
    /// The response payload.
    pub response: Value,
    /// Wall-clock seconds for this one call.
    pub cost: f64,
}

/// Aggregate statistics over one perf run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PerfStats {
    /// Wall-clock seconds for the whole run (not the sum of per-item costs).
    pub test_cost: f64,
    /// Mean per-item cost in seconds.
    pub latency: f64,
    /// Number of items tested.
    pub test_num: usize,
    /// Items per second of wall-clock time: `test_num / test_cost`.
    pub qps: f64,
}

/// Statistics over zero items are undefined; rejected up front instead of
/// letting a division produce NaN.
#[derive(Debug, Error)]
#[error("perf statistics are undefined over zero items")]
pub struct NoItems;

/// Runs `call_fn` over every item with `workers` concurrent slots and
/// aggregates the per-item costs. Any item failure aborts the run.
pub fn run_perf<E, F>(
    items: Vec<Value>,
    call_fn: F,
    workers: usize,
    progress_tx: Option<&mpsc::Sender<PoolProgress>>,
) -> Result<(Vec<CallRecord>, PerfStats)>
where
    E: Send + fmt::Display,
    F: Fn(Value) -> Result<CallRecord, E> + Sync,
{
    if items.is_empty() {
        return Err(NoItems.into());
    }

    let pool = WorkerPool::new(workers);
    let started = Instant::now();
    let results = pool
        .run(items, call_fn, FaultPolicy::Propagate, progress_tx)
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let test_cost = started.elapsed().as_secs_f64();

    let test_num = results.len();
    let latency = results.iter().map(|r| r.cost).sum::<f64>() / test_num as f64;
    let qps = test_num as f64 / test_cost;

    Ok((results, PerfStats { test_cost, latency, test_num, qps }))
}
