//! Upload benchmark. Grounded on `pkg/bench/put.go`'s `Put`: `Prepare`
//! empties the bucket, every worker gets a fresh [`RandomObjectSource`],
//! `Cleanup` removes every prefix a worker claimed.

use s3bench_dispatch::ClientPool;

use crate::benchmarks::{Benchmark, WorkerAssignment};
use crate::error::BenchError;
use crate::record::OperationKind;
use crate::source::{RandomObjectSource, WorkerSource};

#[derive(Default)]
pub struct Put {
    prefixes: Vec<String>,
}

impl Benchmark for Put {
    fn prepare(&mut self, pool: &ClientPool, bucket: &str) -> Result<(), BenchError> {
        let (client, guard) = pool.dispatch();
        client.ensure_empty_bucket(bucket)?;
        guard.release();
        Ok(())
    }

    fn worker_assignments(
        &mut self,
        _pool: &ClientPool,
        _bucket: &str,
        concurrency: usize,
        obj_size: u64,
    ) -> Result<Vec<WorkerAssignment>, BenchError> {
        let mut assignments = Vec::with_capacity(concurrency);
        for _ in 0..concurrency {
            let source = RandomObjectSource::new(obj_size);
            self.prefixes.push(source.prefix().to_string());
            assignments.push(WorkerAssignment {
                kind: OperationKind::Put,
                source: WorkerSource::Put(source),
            });
        }
        Ok(assignments)
    }

    fn prefixes(&self) -> Vec<String> {
        self.prefixes.clone()
    }
}
