//! Download benchmark. `Prepare` empties the bucket; `worker_assignments`
//! uploads a warm set of objects per worker and hands each worker a
//! [`CyclicKeySource`] over its own share, so reads never run dry.

use s3bench_common::random_prefix;
use s3bench_dispatch::ClientPool;

use crate::benchmarks::{Benchmark, WorkerAssignment};
use crate::error::BenchError;
use crate::record::OperationKind;
use crate::source::{CyclicKeySource, WorkerSource, prime_objects};

/// How many objects to upload per worker during warm-up, so a single
/// worker's cyclic read set isn't trivially small.
const WARM_OBJECTS_PER_WORKER: usize = 8;

#[derive(Default)]
pub struct Get {
    run_prefix: String,
    prefixes: Vec<String>,
}

impl Benchmark for Get {
    fn prepare(&mut self, pool: &ClientPool, bucket: &str) -> Result<(), BenchError> {
        let (client, guard) = pool.dispatch();
        client.ensure_empty_bucket(bucket)?;
        guard.release();
        self.run_prefix = random_prefix();
        Ok(())
    }

    fn worker_assignments(
        &mut self,
        pool: &ClientPool,
        bucket: &str,
        concurrency: usize,
        obj_size: u64,
    ) -> Result<Vec<WorkerAssignment>, BenchError> {
        let mut assignments = Vec::with_capacity(concurrency);
        for i in 0..concurrency {
            let worker_prefix = format!("{}w{i}/", self.run_prefix);
            let keys = prime_objects(pool, bucket, &worker_prefix, WARM_OBJECTS_PER_WORKER, obj_size)?;
            self.prefixes.push(worker_prefix.clone());
            assignments.push(WorkerAssignment {
                kind: OperationKind::Get,
                source: WorkerSource::Get(CyclicKeySource::new(worker_prefix, keys)),
            });
        }
        Ok(assignments)
    }

    fn prefixes(&self) -> Vec<String> {
        self.prefixes.clone()
    }
}
