//! `snippets perf` – drive a perf test against a service URL.
//!
//! Reads JSON Lines input, POSTs every record with a bounded worker pool
//! (optionally retrying transient failures), and writes one pretty-printed
//! JSON document with the per-item records and the aggregate stats. Nothing
//! is written when the run aborts.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use snippets_core::config::SnippetsConfig;
use snippets_core::perf::{self, CallRecord, PerfStats};
use snippets_core::pool::PoolProgress;
use snippets_core::records;
use snippets_core::retry::{call_with_retry, BackoffSpec};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

pub struct PerfArgs {
    pub input_path: String,
    pub url: String,
    pub workers: Option<usize>,
    pub output: Option<String>,
    pub max_num: Option<usize>,
    pub retries: Option<u32>,
}

/// Full report written to the output file.
#[derive(Serialize)]
struct PerfReport<'a> {
    results: &'a [CallRecord],
    stats: &'a PerfStats,
}

const PROGRESS_INTERVAL_MS: u64 = 500;

pub fn run_perf_command(cfg: &SnippetsConfig, args: PerfArgs) -> Result<()> {
    let workers = args.workers.unwrap_or(cfg.default_workers).max(1);
    let max_retries = args
        .retries
        .or_else(|| cfg.retry.as_ref().map(|r| r.max_retries))
        .unwrap_or(0);
    let backoff = match &cfg.retry {
        Some(retry) => retry.backoff()?,
        None => BackoffSpec::default(),
    };
    tracing::info!(
        input_path = %args.input_path,
        url = %args.url,
        workers,
        max_retries,
        "perf starts"
    );

    let items = records::load_json_lines(Path::new(&args.input_path), args.max_num)?;
    let output_path = args
        .output
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(&args.input_path, workers));

    let (progress_tx, progress_rx) = mpsc::channel::<PoolProgress>();
    let printer = std::thread::spawn(move || print_progress(progress_rx));

    let url = args.url.clone();
    let call_fn = move |item: Value| {
        call_with_retry(
            || perf::call_service(&url, item.clone()),
            max_retries,
            &backoff,
        )
    };

    let run = perf::run_perf(items, call_fn, workers, Some(&progress_tx));
    drop(progress_tx);
    let _ = printer.join();
    let (results, stats) = run?;

    records::dump_json_pretty(&PerfReport { results: &results, stats: &stats }, &output_path)
        .with_context(|| format!("write report to {}", output_path.display()))?;

    tracing::info!(
        test_num = stats.test_num,
        test_cost = stats.test_cost,
        latency = stats.latency,
        qps = stats.qps,
        "perf done, report at {}",
        output_path.display()
    );
    println!(
        "{} items in {:.3}s  latency {:.4}s  qps {:.2}  -> {}",
        stats.test_num,
        stats.test_cost,
        stats.latency,
        stats.qps,
        output_path.display()
    );
    Ok(())
}

/// Prints throttled `completed/total` lines until the channel closes.
fn print_progress(rx: mpsc::Receiver<PoolProgress>) {
    let mut last_print: Option<Instant> = None;
    while let Ok(progress) = rx.recv() {
        let due = last_print
            .map(|t| t.elapsed() >= Duration::from_millis(PROGRESS_INTERVAL_MS))
            .unwrap_or(true);
        if due || progress.is_done() {
            println!("  {}", progress);
            last_print = Some(Instant::now());
        }
    }
}

/// `queries.jsonl` with 4 workers becomes `queries.perf4.json` next to the input.
fn default_output_path(input_path: &str, workers: usize) -> PathBuf {
    let input = Path::new(input_path);
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("perf");
    input.with_file_name(format!("{}.perf{}.json", stem, workers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_derived_from_input() {
        assert_eq!(
            default_output_path("data/queries.jsonl", 4),
            PathBuf::from("data/queries.perf4.json")
        );
        assert_eq!(
            default_output_path("queries.jsonl", 1),
            PathBuf::from("queries.perf1.json")
        );
    }
}
