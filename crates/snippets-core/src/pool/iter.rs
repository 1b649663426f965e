//! Lazy execution: results stream back in completion order.
//!
//! Used for sources with no known length. Workers own `Arc` clones of the
//! shared state and the returned iterator is backed by the result channel;
//! dropping it aborts outstanding work and joins the threads.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use super::progress::{PoolProgress, ProgressState};
use super::{FaultPolicy, PoolError};

/// Streaming results of a lazy pool run, in completion order.
///
/// Yields `Ok` per finished item. Under [`FaultPolicy::Propagate`] the first
/// failure is yielded as `Err` and the iterator then ends; under
/// [`FaultPolicy::SuppressAndSkip`] failures are logged and skipped.
pub struct PoolIter<O, E> {
    rx: mpsc::Receiver<Result<O, PoolError<E>>>,
    handles: Vec<thread::JoinHandle<()>>,
    abort: Arc<AtomicBool>,
    fused: bool,
}

pub(super) fn spawn<I, O, E, F, It>(
    workers: usize,
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
    let source = Arc::new(Mutex::new(items.enumerate()));
    let f = Arc::new(f);
    let abort = Arc::new(AtomicBool::new(false));
    // No known total for a lazy source; progress is an unbounded counter.
    let progress = Arc::new(ProgressState::new(None));
    let (tx, rx) = mpsc::channel();

    let handles = (0..workers)
        .map(|_| {
            let source = Arc::clone(&source);
            let f = Arc::clone(&f);
            let abort = Arc::clone(&abort);
            let progress = Arc::clone(&progress);
            let tx = tx.clone();
            let ptx = progress_tx.clone();
            thread::spawn(move || loop {
                if abort.load(Ordering::Relaxed) {
                    break;
                }
                let next = source.lock().unwrap().next();
                let Some((index, item)) = next else {
                    break;
                };
                let res = f(item);
                let p = progress.complete();
                if let Some(ptx) = &ptx {
                    let _ = ptx.send(p);
                }
                let out = match res {
                    Ok(v) => Ok(v),
                    Err(e) => match fault_policy {
                        FaultPolicy::SuppressAndSkip => {
                            tracing::warn!(index, error = %e, "item failed, dropped from output");
                            continue;
                        }
                        FaultPolicy::Propagate => {
                            abort.store(true, Ordering::Relaxed);
                            Err(PoolError::Item { index, source: e })
                        }
                    },
                };
                if tx.send(out).is_err() {
                    break;
                }
            })
        })
        .collect();

    PoolIter { rx, handles, abort, fused: false }
}

impl<O, E> Iterator for PoolIter<O, E> {
    type Item = Result<O, PoolError<E>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }
        match self.rx.recv() {
            Ok(Ok(v)) => Some(Ok(v)),
            Ok(Err(e)) => {
                self.fused = true;
                Some(Err(e))
            }
            // All senders gone: every worker finished.
            Err(_) => None,
        }
    }
}

impl<O, E> Drop for PoolIter<O, E> {
    fn drop(&mut self) {
        self.abort.store(true, Ordering::Relaxed);
        for h in self.handles.drain(..) {
            let _ = h.join();
        }
    }
}
