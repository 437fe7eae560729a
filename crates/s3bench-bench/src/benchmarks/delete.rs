//! Delete benchmark. Like [`super::get::Get`], `worker_assignments` primes a
//! warm set per worker, but each worker drains a [`DeleteSource`] instead of
//! cycling — deletes consume keys, so the source refills with a disposable
//! single-use object once its warm set runs dry (see `source.rs`).

use s3bench_common::random_prefix;
use s3bench_dispatch::ClientPool;

use crate::benchmarks::{Benchmark, WorkerAssignment};
use crate::error::BenchError;
use crate::record::OperationKind;
use crate::source::{DeleteSource, WorkerSource, prime_objects};

const WARM_OBJECTS_PER_WORKER: usize = 64;

#[derive(Default)]
pub struct Delete {
    run_prefix: String,
    prefixes: Vec<String>,
}

impl Benchmark for Delete {
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
                kind: OperationKind::Delete,
                source: WorkerSource::Delete(DeleteSource::new(worker_prefix, keys, obj_size)),
            });
        }
        Ok(assignments)
    }

    fn prefixes(&self) -> Vec<String> {
        self.prefixes.clone()
    }
}

#[cfg(test)]
mod tests {
    use s3bench_store::{MockObjectStoreClient, ObjectStoreClient};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn worker_assignments_uploads_a_warm_set_per_worker() {
        let client: Arc<dyn ObjectStoreClient> = Arc::new(MockObjectStoreClient::new("host-0"));
        let pool = ClientPool::new(vec![client], s3bench_dispatch::SelectionPolicy::RoundRobin).unwrap();
        let mut delete = Delete::default();
        delete.prepare(&pool, "bucket").unwrap();

        let assignments = delete.worker_assignments(&pool, "bucket", 2, 32).unwrap();

        assert_eq!(assignments.len(), 2);
        assert_eq!(delete.prefixes().len(), 2);
        for a in &assignments {
            assert_eq!(a.kind, OperationKind::Delete);
        }
    }
}
