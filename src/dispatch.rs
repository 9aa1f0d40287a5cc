//! Parallel-for over disjoint index ranges.
//!
//! A `Dispatcher` runs one worker per range. Each worker gets its own
//! mutable sub-slice of the output, cut with `split_disjoint`, and whatever
//! shared state the closure borrows. `run` returns only after every worker
//! has finished, so the caller may read the whole output afterwards.

use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use log::{debug, error};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::{Backend, WorkerFailure};
use crate::error::{Result, SimError};
use crate::partition::split_disjoint;

/// How one worker ended.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerOutcome {
    pub worker: usize,
    pub range: Range<usize>,
    /// Panic message if the worker did not complete.
    pub failure: Option<String>,
}

impl WorkerOutcome {
    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }
}

pub enum Dispatcher {
    Rayon(ThreadPool),
    Threads,
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl Dispatcher {
    pub fn new(backend: Backend, workers: usize) -> Result<Self> {
        match backend {
            Backend::Rayon => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(workers.max(1))
                    .thread_name(|i| format!("force-worker-{i}"))
                    .build()?;
                debug!("built rayon pool with {} threads", pool.current_num_threads());
                Ok(Dispatcher::Rayon(pool))
            }
            Backend::Threads => Ok(Dispatcher::Threads),
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            Dispatcher::Rayon(_) => Backend::Rayon,
            Dispatcher::Threads => Backend::Threads,
        }
    }

    /// Runs `work(range, slice)` once per range, in parallel, with `slice`
    /// being `out[range]`. Blocks until all workers have terminated. A
    /// worker that panics has its whole slice reset to `T::default()`.
    pub fn run<T, F>(&self, ranges: &[Range<usize>], out: &mut [T], work: F) -> Result<Vec<WorkerOutcome>>
    where
        T: Send + Clone + Default,
        F: Fn(Range<usize>, &mut [T]) + Sync,
    {
        let parts = split_disjoint(out, ranges);
        let failures = match self {
            Dispatcher::Rayon(pool) => run_rayon(pool, ranges, parts, &work),
            Dispatcher::Threads => run_threads(ranges, parts, &work)?,
        };

        Ok(ranges
            .iter()
            .cloned()
            .zip(failures)
            .enumerate()
            .map(|(worker, (range, failure))| WorkerOutcome { worker, range, failure })
            .collect())
    }
}

/// Runs one worker to completion or panic. On panic the slice is cleared so
/// no partially summed values survive.
fn run_worker<T, F>(work: &F, range: Range<usize>, part: &mut [T]) -> Option<String>
where
    T: Clone + Default,
    F: Fn(Range<usize>, &mut [T]),
{
    let failure = panic::catch_unwind(AssertUnwindSafe(|| work(range, &mut *part)))
        .err()
        .map(panic_message);
    if failure.is_some() {
        part.fill(T::default());
    }
    failure
}

fn run_rayon<T, F>(pool: &ThreadPool, ranges: &[Range<usize>], parts: Vec<&mut [T]>, work: &F) -> Vec<Option<String>>
where
    T: Send + Clone + Default,
    F: Fn(Range<usize>, &mut [T]) + Sync,
{
    let mut failures: Vec<Option<String>> = vec![None; ranges.len()];
    pool.scope(|s| {
        for ((slot, part), range) in failures.iter_mut().zip(parts).zip(ranges.iter().cloned()) {
            s.spawn(move |_| *slot = run_worker(work, range, part));
        }
    });
    failures
}

#[cfg(test)]
thread_local! {
    static REFUSE_SPAWN_AT: std::cell::Cell<Option<usize>> = std::cell::Cell::new(None);
}

#[cfg(test)]
fn spawn_refused(worker: usize) -> bool {
    REFUSE_SPAWN_AT.with(|c| c.get()) == Some(worker)
}

#[cfg(not(test))]
fn spawn_refused(_worker: usize) -> bool {
    false
}

fn spawn_worker<'scope, 'env, R, W>(
    s: &'scope thread::Scope<'scope, 'env>,
    worker: usize,
    f: W,
) -> std::io::Result<thread::ScopedJoinHandle<'scope, R>>
where
    W: FnOnce() -> R + Send + 'scope,
    R: Send + 'scope,
{
    if spawn_refused(worker) {
        return Err(std::io::Error::new(std::io::ErrorKind::Other, "spawn refused"));
    }
    thread::Builder::new()
        .name(format!("force-worker-{worker}"))
        .spawn_scoped(s, f)
}

fn run_threads<T, F>(ranges: &[Range<usize>], parts: Vec<&mut [T]>, work: &F) -> Result<Vec<Option<String>>>
where
    T: Send + Clone + Default,
    F: Fn(Range<usize>, &mut [T]) + Sync,
{
    thread::scope(|s| -> Result<Vec<Option<String>>> {
        let mut handles = Vec::with_capacity(ranges.len());
        let mut spawn_error = None;
        for (worker, (part, range)) in parts.into_iter().zip(ranges.iter().cloned()).enumerate() {
            match spawn_worker(s, worker, move || run_worker(work, range, part)) {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    spawn_error = Some(SimError::Spawn { worker, source });
                    break;
                }
            }
        }

        // Join whatever was started before reporting a spawn failure.
        let failures: Vec<Option<String>> = handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|payload| Some(panic_message(payload))))
            .collect();
        match spawn_error {
            Some(err) => Err(err),
            None => Ok(failures),
        }
    })
}

/// Applies the failure policy to a step's outcomes. Every failure is logged;
/// under `Fatal` the first one becomes the error.
pub fn check_outcomes(outcomes: &[WorkerOutcome], policy: WorkerFailure) -> Result<()> {
    let mut first = None;
    for o in outcomes.iter().filter(|o| !o.is_ok()) {
        let message = o.failure.clone().unwrap_or_default();
        error!(
            "worker {} failed on bodies [{}, {}): {}",
            o.worker, o.range.start, o.range.end, message
        );
        if first.is_none() {
            first = Some(SimError::WorkerFailed {
                worker: o.worker,
                start: o.range.start,
                end: o.range.end,
                message,
            });
        }
    }
    match (policy, first) {
        (WorkerFailure::Fatal, Some(err)) => Err(err),
        _ => Ok(()),
    }
}
