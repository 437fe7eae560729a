//! Mixed workload: a single bucket driven by `PUT`, `GET`, and `DELETE`
//! workers running concurrently, so the aggregator sees more than one
//! operation type within one active time range (the "mixed run" the
//! glossary defines). Concurrency is split as evenly as possible across the
//! three kinds; any remainder goes to `PUT` first, then `GET` — not
//! specified upstream (only `put.go` survived retrieval), so this is the
//! simplest even split that still guarantees every configured kind runs at
//! least one worker once concurrency is at least 3.

use s3bench_dispatch::ClientPool;

use crate::benchmarks::delete::Delete;
use crate::benchmarks::get::Get;
use crate::benchmarks::put::Put;
use crate::benchmarks::{Benchmark, WorkerAssignment};
use crate::error::BenchError;

#[derive(Default)]
pub struct Mixed {
    put: Put,
    get: Get,
    delete: Delete,
}

impl Benchmark for Mixed {
    fn prepare(&mut self, pool: &ClientPool, bucket: &str) -> Result<(), BenchError> {
        // Each sub-benchmark's `prepare` re-empties the (still-empty)
        // bucket and picks its own run prefix; harmless since nothing has
        // been uploaded yet at this point.
        self.put.prepare(pool, bucket)?;
        self.get.prepare(pool, bucket)?;
        self.delete.prepare(pool, bucket)?;
        Ok(())
    }

    fn worker_assignments(
        &mut self,
        pool: &ClientPool,
        bucket: &str,
        concurrency: usize,
        obj_size: u64,
    ) -> Result<Vec<WorkerAssignment>, BenchError> {
        let third = concurrency / 3;
        let remainder = concurrency % 3;
        let put_count = third + if remainder > 0 { 1 } else { 0 };
        let get_count = third + if remainder > 1 { 1 } else { 0 };
        let delete_count = third;

        let mut assignments = Vec::with_capacity(concurrency);
        assignments.extend(self.put.worker_assignments(pool, bucket, put_count, obj_size)?);
        assignments.extend(self.get.worker_assignments(pool, bucket, get_count, obj_size)?);
        assignments.extend(self.delete.worker_assignments(pool, bucket, delete_count, obj_size)?);
        Ok(assignments)
    }

    fn prefixes(&self) -> Vec<String> {
        let mut prefixes = self.put.prefixes();
        prefixes.extend(self.get.prefixes());
        prefixes.extend(self.delete.prefixes());
        prefixes
    }
}
