//! Benchmark orchestration.

use crate::worker::do_bulk_insert;
use bench_core::Document;
use bench_insert::{DocumentStore, InsertError};
use std::any::Any;
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info};

/// Parameters of one benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchConfig {
    /// Documents inserted by each worker.
    pub doc_count: u64,
    /// Number of worker threads.
    pub thread_count: usize,
}

/// Errors that abort or fail a benchmark run.
#[derive(Error, Debug)]
pub enum BenchError {
    /// The warm-up statistics request failed.
    #[error("Warm-up request to database '{database}' failed: {source}")]
    WarmUp {
        database: String,
        #[source]
        source: InsertError,
    },

    /// A worker thread could not be started.
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// One or more workers did not complete.
    #[error("{failed} of {total} workers failed")]
    WorkersFailed { failed: usize, total: usize },
}

/// Why a worker did not complete.
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error(transparent)]
    Insert(#[from] InsertError),

    #[error("Worker panicked: {0}")]
    Panicked(String),
}

/// Result of one worker thread.
#[derive(Debug)]
pub struct WorkerReport {
    pub worker: usize,
    /// Documents stored, or the reason the worker stopped.
    pub outcome: Result<u64, WorkerError>,
}

/// Result of a benchmark run.
#[derive(Debug)]
pub struct BenchReport {
    pub config: BenchConfig,
    /// Wall-clock time of the parallel phase.
    pub elapsed: Duration,
    pub workers: Vec<WorkerReport>,
}

impl BenchReport {
    /// Documents stored by workers that completed.
    pub fn total_stored(&self) -> u64 {
        self.workers
            .iter()
            .filter_map(|w| w.outcome.as_ref().ok())
            .sum()
    }

    /// Number of workers that did not complete.
    pub fn failed(&self) -> usize {
        self.workers.iter().filter(|w| w.outcome.is_err()).count()
    }

    /// Calculate documents per second.
    pub fn docs_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.total_stored() as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Fail if any worker did not complete.
    pub fn ensure_success(&self) -> Result<(), BenchError> {
        match self.failed() {
            0 => Ok(()),
            failed => Err(BenchError::WorkersFailed {
                failed,
                total: self.workers.len(),
            }),
        }
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.elapsed)
    }
}

/// Run the benchmark against `store`.
///
/// Sends one statistics request to warm up the connection, then starts
/// `thread_count` workers that each insert `doc_count` documents from
/// `pool`. Every worker gets its own copy of the records it will use,
/// made before the timer starts. Only the parallel phase is timed. A failed
/// worker does not stop the others; failures are recorded in the returned
/// report.
pub fn run_benchmark<S, D>(
    store: &S,
    pool: &[D],
    config: &BenchConfig,
) -> Result<BenchReport, BenchError>
where
    S: DocumentStore,
    D: Document + Clone + Send,
{
    let stats = store.statistics().map_err(|source| BenchError::WarmUp {
        database: store.database().to_string(),
        source,
    })?;
    info!(
        "Connected to database '{}' ({} documents in {} collections)",
        store.database(),
        stats.documents,
        stats.collections
    );

    info!(
        "Starting {} workers, {} documents each (pool size: {})",
        config.thread_count,
        config.doc_count,
        pool.len()
    );

    let doc_count = config.doc_count;
    let private_pools: Vec<Vec<D>> = (0..config.thread_count)
        .map(|_| private_pool(pool, doc_count))
        .collect();
    debug!(
        "Prepared {} private pools of {} records",
        private_pools.len(),
        private_pools.first().map_or(0, Vec::len)
    );

    let start = Instant::now();

    let workers = thread::scope(|scope| -> Result<Vec<WorkerReport>, BenchError> {
        let handles = private_pools
            .into_iter()
            .enumerate()
            .map(|(worker, mut documents)| {
                thread::Builder::new()
                    .name(format!("bulk-insert-{worker}"))
                    .spawn_scoped(scope, move || {
                        do_bulk_insert(store, &mut documents, doc_count)
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(handles
            .into_iter()
            .enumerate()
            .map(|(worker, handle)| {
                let outcome = match handle.join() {
                    Ok(result) => result.map_err(WorkerError::from),
                    Err(payload) => Err(WorkerError::Panicked(panic_message(payload))),
                };
                if let Err(e) = &outcome {
                    error!("Worker {} failed: {}", worker, e);
                }
                WorkerReport { worker, outcome }
            })
            .collect())
    })?;

    let report = BenchReport {
        config: *config,
        elapsed: start.elapsed(),
        workers,
    };

    info!(
        "Benchmark complete: {} documents in {:?} ({:.2} docs/sec, {} failed workers)",
        report.total_stored(),
        report.elapsed,
        report.docs_per_second(),
        report.failed()
    );

    Ok(report)
}

/// Copy the records one worker will touch.
///
/// A worker inserting `doc_count` documents only reaches past the first
/// `doc_count` records when it wraps around, so shorter runs get a prefix.
fn private_pool<D: Clone>(pool: &[D], doc_count: u64) -> Vec<D> {
    let len = usize::try_from(doc_count).map_or(pool.len(), |n| n.min(pool.len()));
    pool[..len].to_vec()
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
