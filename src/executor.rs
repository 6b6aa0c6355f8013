//! Parallel execution of sampling chunks.
//!
//! One unit of execution per chunk, either an OS thread or a tokio blocking
//! task. The caller is blocked until every worker has finished; results come
//! back in chunk order.

use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::thread;

use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::task;
use tracing::debug;

use crate::error::{EstimateError, Result};
use crate::sampler::{count_inside, SeedStrategy};

/// One worker's assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerTask {
    pub index: usize,
    pub samples: u64,
}

/// Function run by every worker; returns the number of hits in its chunk.
pub type WorkerFn = Arc<dyn Fn(WorkerTask) -> u64 + Send + Sync + 'static>;

/// Default worker: the local sampler with a generator private to the task.
pub fn sampling_worker(seed: SeedStrategy) -> WorkerFn {
    Arc::new(move |task: WorkerTask| {
        let mut points = seed.points_for(task.index);
        count_inside(&mut points, task.samples)
    })
}

/// Concurrency backend used to run the workers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backend {
    /// One OS thread per worker.
    #[default]
    Threads,
    /// One `spawn_blocking` task per worker on a tokio runtime.
    Tokio,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "threads" | "thread" => Ok(Backend::Threads),
            "tokio" | "async" => Ok(Backend::Tokio),
            other => Err(format!("unknown backend '{other}': expected threads or tokio")),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Threads => write!(f, "threads"),
            Backend::Tokio => write!(f, "tokio"),
        }
    }
}

/// Runs chunks concurrently and gathers their partial results.
#[derive(Clone, Copy, Debug, Default)]
pub struct Executor {
    backend: Backend,
}

impl Executor {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Runs `worker` once per chunk and returns the hits in chunk order.
    ///
    /// Every spawned worker is joined before this returns, even when one of
    /// them fails. The first failure in chunk order is reported.
    ///
    /// With [`Backend::Tokio`] the workers run on the caller's runtime when
    /// there is one, otherwise on a runtime built for this call. A caller on a
    /// current-thread runtime gets [`EstimateError::CurrentThreadRuntime`];
    /// use [`run_tokio`] there instead.
    pub fn run(&self, chunks: &[u64], worker: WorkerFn) -> Result<Vec<u64>> {
        match self.backend {
            Backend::Threads => run_threads(chunks, worker),
            Backend::Tokio => match Handle::try_current() {
                Ok(handle) => {
                    if handle.runtime_flavor() != RuntimeFlavor::MultiThread {
                        return Err(EstimateError::CurrentThreadRuntime);
                    }
                    task::block_in_place(|| handle.block_on(run_tokio(chunks, worker)))
                }
                Err(_) => {
                    let runtime = tokio::runtime::Builder::new_multi_thread()
                        .enable_all()
                        .build()
                        .map_err(EstimateError::Runtime)?;
                    runtime.block_on(run_tokio(chunks, worker))
                }
            },
        }
    }
}

/// Thread-per-chunk execution.
pub fn run_threads(chunks: &[u64], worker: WorkerFn) -> Result<Vec<u64>> {
    let handles: Vec<_> = chunks
        .iter()
        .copied()
        .enumerate()
        .map(|(index, samples)| {
            let worker = Arc::clone(&worker);
            let task = WorkerTask { index, samples };

            let handle = thread::Builder::new()
                .name(format!("pi-worker-{index}"))
                .spawn(move || worker(task));

            (task, handle)
        })
        .collect();

    let mut results = Vec::with_capacity(chunks.len());
    for (task, handle) in handles {
        let outcome = match handle {
            Ok(handle) => handle.join().map_err(panic_message),
            Err(e) => Err(format!("failed to spawn thread: {e}")),
        };
        results.push(check_outcome(task, outcome));
    }

    results.into_iter().collect()
}

/// Blocking-task-per-chunk execution on the current tokio runtime.
pub async fn run_tokio(chunks: &[u64], worker: WorkerFn) -> Result<Vec<u64>> {
    let handles: Vec<_> = chunks
        .iter()
        .copied()
        .enumerate()
        .map(|(index, samples)| {
            let worker = Arc::clone(&worker);
            let task = WorkerTask { index, samples };
            (task, task::spawn_blocking(move || worker(task)))
        })
        .collect();

    let mut results = Vec::with_capacity(chunks.len());
    for (task, handle) in handles {
        let outcome = handle.await.map_err(|e| {
            if e.is_panic() {
                panic_message(e.into_panic())
            } else {
                e.to_string()
            }
        });
        results.push(check_outcome(task, outcome));
    }

    results.into_iter().collect()
}

fn check_outcome(task: WorkerTask, outcome: std::result::Result<u64, String>) -> Result<u64> {
    let hits = outcome.map_err(|reason| EstimateError::WorkerFailure {
        worker: task.index,
        reason,
    })?;

    if hits > task.samples {
        return Err(EstimateError::WorkerFailure {
            worker: task.index,
            reason: format!("reported {hits} hits for a chunk of {}", task.samples),
        });
    }

    debug!(worker = task.index, samples = task.samples, hits, "worker finished");
    Ok(hits)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
