//! The four benchmark subclasses (`Put`/`Get`/`Delete`/`Mixed`), each an
//! implementor of [`Benchmark`] — the Rust analogue of the original
//! `Common`-embedding `Put`/`Get`/`Delete`/`Mixed` structs, generalized to
//! share `s3bench_bench::worker::run_worker` instead of one worker loop per
//! subclass.

pub mod delete;
pub mod get;
pub mod mixed;
pub mod put;

use s3bench_dispatch::ClientPool;

use crate::error::BenchError;
use crate::record::OperationKind;
use crate::source::WorkerSource;

/// Per-worker assignment a benchmark hands the runner: which operation kind
/// that thread performs, and the source it draws objects from.
pub struct WorkerAssignment {
    pub kind: OperationKind,
    pub source: WorkerSource,
}

/// A runnable benchmark. `Prepare`/`Cleanup` bracket the measured run;
/// `worker_assignments` is called once, after `prepare`, to build exactly
/// `concurrency` per-thread assignments.
pub trait Benchmark: Send {
    /// Idempotent setup: ensure the bucket exists and is empty, and (for
    /// benchmarks that read or delete) upload the warm set workers will
    /// draw from.
    fn prepare(&mut self, pool: &ClientPool, bucket: &str) -> Result<(), BenchError>;

    /// Build one assignment per worker thread. Called once per run, after
    /// `prepare`, with the resolved concurrency and object size. Takes the
    /// dispatch pool because `Get`/`Delete`/`Mixed` must upload a warm set
    /// to read or delete from before any worker starts.
    fn worker_assignments(
        &mut self,
        pool: &ClientPool,
        bucket: &str,
        concurrency: usize,
        obj_size: u64,
    ) -> Result<Vec<WorkerAssignment>, BenchError>;

    /// Every prefix any assignment's source claimed, observed after
    /// `worker_assignments` has been called. Cleanup targets exactly these.
    fn prefixes(&self) -> Vec<String>;

    /// Remove everything the run created, across every observed prefix.
    fn cleanup(&self, pool: &ClientPool, bucket: &str) -> Result<(), BenchError> {
        for prefix in self.prefixes() {
            let (client, guard) = pool.dispatch();
            client.delete_prefix(bucket, &prefix)?;
            guard.release();
        }
        Ok(())
    }
}
