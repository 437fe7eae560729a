//! Orchestration: wires a [`Benchmark`] through `Prepare` → spawn workers →
//! start barrier → timeout/cancellation → `Collector::close` → `Cleanup`.
//! Grounded on `pkg/bench/put.go`'s `Start` (the `wg`/`wait` dance) composed
//! with the collector's auto-termination per §9's "monitor cancels a child
//! context the worker pool consumes" design note.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use s3bench_dispatch::ClientPool;
use tracing::info;

use crate::barrier::StartBarrier;
use crate::benchmarks::Benchmark;
use crate::cancel::CancelToken;
use crate::collector::{AutoTermOptions, Collector};
use crate::error::BenchError;
use crate::record::OperationRecord;
use crate::worker::{WorkerContext, run_worker};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub concurrency: usize,
    pub bucket: String,
    pub obj_size: u64,
    pub duration: Duration,
    pub autoterm: Option<AutoTermOptions>,
}

pub struct RunOutcome {
    pub records: Vec<OperationRecord>,
    pub prefixes: Vec<String>,
    /// Whether the run ended by reaching its configured duration/auto-term
    /// condition rather than external cancellation (always true today;
    /// kept so callers can log accordingly once a richer reason is wired
    /// through — no concrete call site yet).
    pub completed: bool,
}

/// Run one benchmark end to end. `cancel` is the run's single cancellation
/// source (§5): the caller may hold a clone to cancel externally (operator
/// interrupt); this function additionally cancels it once `options.duration`
/// elapses or (if configured) once throughput auto-terminates.
pub fn run(benchmark: &mut dyn Benchmark, pool: Arc<ClientPool>, options: RunOptions, cancel: CancelToken) -> Result<RunOutcome, BenchError> {
    if options.concurrency == 0 {
        return Err(BenchError::ZeroConcurrency);
    }
    if options.duration.is_zero() {
        return Err(BenchError::ZeroDuration);
    }

    benchmark.prepare(pool.as_ref(), &options.bucket)?;
    let assignments = benchmark.worker_assignments(pool.as_ref(), &options.bucket, options.concurrency, options.obj_size)?;

    let mut collector = Collector::new();
    collector.start();

    let run_start = Instant::now();
    if let Some(autoterm) = options.autoterm.clone() {
        collector.auto_terminate(autoterm, cancel.clone(), run_start);
    }

    let mut barrier = StartBarrier::new();
    let handles: Vec<_> = assignments
        .into_iter()
        .enumerate()
        .map(|(i, assignment)| {
            let ctx = WorkerContext {
                thread_id: i as u16,
                kind: assignment.kind,
                bucket: options.bucket.clone(),
                pool: Arc::clone(&pool),
                cancel: cancel.clone(),
                start_wait: barrier.waiter(),
                results: collector.sender(),
            };
            thread::spawn(move || run_worker(ctx, assignment.source))
        })
        .collect();

    barrier.release();
    info!(concurrency = options.concurrency, bucket = %options.bucket, "run started");

    // Fire-and-forget: cancels the shared token once the configured
    // duration elapses. If auto-termination (or an external signal) cancels
    // first, this thread's later call is a harmless no-op store.
    let duration_cancel = cancel.clone();
    let duration = options.duration;
    thread::spawn(move || {
        thread::sleep(duration);
        duration_cancel.cancel();
    });

    for handle in handles {
        handle.join().expect("benchmark worker thread panicked");
    }
    // Every worker has exited, which only happens once the token is
    // cancelled; this call is therefore always a no-op, kept as a
    // safety net against a future worker loop that exits some other way.
    cancel.cancel();

    let records = collector.close();
    let prefixes = benchmark.prefixes();
    benchmark.cleanup(pool.as_ref(), &options.bucket)?;

    info!(operations = records.len(), "run complete");

    Ok(RunOutcome {
        records,
        prefixes,
        completed: true,
    })
}
