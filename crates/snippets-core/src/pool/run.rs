//! Eager bounded execution: fixed worker threads over a shared work queue.
//!
//! Results arrive over a channel keyed by ordinal index and are written into
//! positional slots, so the caller sees input order no matter which worker
//! finishes first. Under `Propagate` the first failure sets an abort flag and
//! drains the queue so no new work is handed out.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Mutex};
use std::thread;

use super::progress::{PoolProgress, ProgressState};
use super::{FaultPolicy, PoolError};

pub(super) fn run_bounded<I, O, E, F>(
    workers: usize,
    items: Vec<I>,
    f: &F,
    fault_policy: FaultPolicy,
    progress_tx: Option<&mpsc::Sender<PoolProgress>>,
) -> Result<Vec<O>, PoolError<E>>
where
    I: Send,
    O: Send,
    E: Send + fmt::Display,
    F: Fn(I) -> Result<O, E> + Sync,
{
    let count = items.len();
    if count == 0 {
        return Ok(Vec::new());
    }

    let work: Mutex<VecDeque<(usize, I)>> = Mutex::new(items.into_iter().enumerate().collect());
    let abort = AtomicBool::new(false);
    let progress = ProgressState::new(Some(count));
    let num_workers = workers.min(count);

    let mut slots: Vec<Option<O>> = (0..count).map(|_| None).collect();
    let mut first_error: Option<PoolError<E>> = None;

    thread::scope(|scope| {
        let (tx, rx) = mpsc::channel::<(usize, Result<O, E>)>();
        for _ in 0..num_workers {
            let tx = tx.clone();
            let ptx = progress_tx.map(mpsc::Sender::clone);
            let work = &work;
            let abort = &abort;
            let progress = &progress;
            scope.spawn(move || loop {
                if abort.load(Ordering::Relaxed) {
                    break;
                }
                let Some((index, item)) = work.lock().unwrap().pop_front() else {
                    break;
                };
                let res = f(item);
                let p = progress.complete();
                if let Some(ptx) = &ptx {
                    let _ = ptx.send(p);
                }
                if tx.send((index, res)).is_err() {
                    break;
                }
            });
        }
        drop(tx);

        let mut to_receive = count;
        while to_receive > 0 {
            let (index, res) = match rx.recv() {
                Ok(pair) => pair,
                Err(_) => {
                    if first_error.is_none() {
                        first_error = Some(PoolError::WorkerLost);
                    }
                    break;
                }
            };
            to_receive -= 1;
            match res {
                Ok(v) => slots[index] = Some(v),
                Err(e) => match fault_policy {
                    FaultPolicy::SuppressAndSkip => {
                        tracing::warn!(index, error = %e, "item failed, dropped from output");
                    }
                    FaultPolicy::Propagate => {
                        abort.store(true, Ordering::Relaxed);
                        let drained = {
                            let mut q = work.lock().unwrap();
                            let mut n = 0;
                            while q.pop_front().is_some() {
                                n += 1;
                            }
                            n
                        };
                        to_receive = to_receive.saturating_sub(drained);
                        if first_error.is_none() {
                            first_error = Some(PoolError::Item { index, source: e });
                        }
                    }
                },
            }
        }
    });

    if let Some(e) = first_error {
        return Err(e);
    }
    // Propagate leaves every slot filled; SuppressAndSkip drops the gaps.
    Ok(slots.into_iter().flatten().collect())
}
