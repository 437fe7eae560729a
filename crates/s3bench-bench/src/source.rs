//! Operation sources: per-worker generators of the objects a worker's loop
//! operates on (§4.2). Each worker owns exactly one source and never shares
//! it; a source also exposes the stable prefix its objects live under, so
//! [`crate::benchmarks`] can target cleanup at exactly the prefixes a run
//! used.

use std::collections::VecDeque;

use s3bench_common::{random_object_name, random_prefix};
use s3bench_store::{ObjectDescriptor, ObjectStoreClient, StoreError};

/// A never-ending stream of freshly generated objects, used by the `PUT`
/// benchmark. Every call to `next` produces a new key under this source's
/// prefix and a freshly randomized body of `size` bytes.
pub struct RandomObjectSource {
    prefix: String,
    size: u64,
}

impl RandomObjectSource {
    pub fn new(size: u64) -> Self {
        Self {
            prefix: random_prefix(),
            size,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn next(&mut self) -> ObjectDescriptor {
        let key = format!("{}{}", self.prefix, random_object_name());
        ObjectDescriptor::random(key, self.size)
    }
}

/// A fixed, pre-populated pool of existing keys a worker cycles through
/// forever, used by the `GET` benchmark: reading an object doesn't consume
/// it, so the same warm set can be read indefinitely.
pub struct CyclicKeySource {
    prefix: String,
    keys: Vec<(String, u64)>,
    next_idx: usize,
}

impl CyclicKeySource {
    pub fn new(prefix: String, keys: Vec<(String, u64)>) -> Self {
        assert!(!keys.is_empty(), "a GET source needs at least one primed key");
        Self {
            prefix,
            keys,
            next_idx: 0,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn next(&mut self) -> (String, u64) {
        let item = self.keys[self.next_idx].clone();
        self.next_idx = (self.next_idx + 1) % self.keys.len();
        item
    }
}

/// A pre-populated pool of keys a worker deletes one by one, used by the
/// `DELETE` benchmark. Deleting consumes the key, so once the pool runs dry
/// the source falls back to uploading a fresh single-use object (outside
/// the timed region) so every dispatched delete still targets something
/// real. This refill behavior isn't specified upstream; it's the simplest
/// way to keep a `DELETE` benchmark running for the full configured
/// duration instead of idling once its warm set is exhausted.
pub struct DeleteSource {
    prefix: String,
    keys: VecDeque<(String, u64)>,
    refill_size: u64,
}

impl DeleteSource {
    pub fn new(prefix: String, keys: Vec<(String, u64)>, refill_size: u64) -> Self {
        Self {
            prefix,
            keys: keys.into(),
            refill_size,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Produce the next key to delete, uploading a fresh replacement object
    /// first if the pre-populated pool is already empty.
    pub fn next(&mut self, client: &dyn ObjectStoreClient, bucket: &str) -> Result<(String, u64), StoreError> {
        if let Some(item) = self.keys.pop_front() {
            return Ok(item);
        }

        let key = format!("{}{}", self.prefix, random_object_name());
        client.put_object(bucket, ObjectDescriptor::random(key.clone(), self.refill_size))?;
        Ok((key, self.refill_size))
    }
}

/// The per-worker source a running worker thread owns, wrapping whichever
/// concrete source matches the [`crate::OperationKind`] it was spawned with.
pub enum WorkerSource {
    Put(RandomObjectSource),
    Get(CyclicKeySource),
    Delete(DeleteSource),
}

impl WorkerSource {
    pub fn prefix(&self) -> &str {
        match self {
            WorkerSource::Put(s) => s.prefix(),
            WorkerSource::Get(s) => s.prefix(),
            WorkerSource::Delete(s) => s.prefix(),
        }
    }
}

/// Upload `count` objects of `size` bytes under `prefix`, round-robining
/// across the dispatcher's hosts, and return their keys. Used to build the
/// warm set a `GET` or `DELETE` benchmark's sources cycle through; these
/// uploads happen during `Prepare`, outside the measured run.
pub fn prime_objects(
    pool: &s3bench_dispatch::ClientPool,
    bucket: &str,
    prefix: &str,
    count: usize,
    size: u64,
) -> Result<Vec<(String, u64)>, StoreError> {
    let mut keys = Vec::with_capacity(count);
    for _ in 0..count {
        let key = format!("{prefix}{}", random_object_name());
        let (client, guard) = pool.dispatch();
        client.put_object(bucket, ObjectDescriptor::random(key.clone(), size))?;
        guard.release();
        keys.push((key, size));
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use s3bench_store::MockObjectStoreClient;

    use super::*;

    #[test]
    fn random_source_generates_unique_keys_under_its_prefix() {
        let mut source = RandomObjectSource::new(128);
        let a = source.next();
        let b = source.next();
        assert_ne!(a.key, b.key);
        assert!(a.key.starts_with(source.prefix()));
        assert_eq!(a.size, 128);
    }

    #[test]
    fn cyclic_source_wraps_around() {
        let mut source = CyclicKeySource::new(
            "p/".to_string(),
            vec![("p/a".to_string(), 1), ("p/b".to_string(), 2)],
        );
        assert_eq!(source.next(), ("p/a".to_string(), 1));
        assert_eq!(source.next(), ("p/b".to_string(), 2));
        assert_eq!(source.next(), ("p/a".to_string(), 1));
    }

    #[test]
    fn delete_source_drains_pool_then_refills() {
        let client = MockObjectStoreClient::new("mock-1:9000");
        client.ensure_empty_bucket("bucket").unwrap();

        let mut source = DeleteSource::new("p/".to_string(), vec![("p/a".to_string(), 8)], 16);

        let first = source.next(&client, "bucket").unwrap();
        assert_eq!(first, ("p/a".to_string(), 8));

        let second = source.next(&client, "bucket").unwrap();
        assert!(second.0.starts_with("p/"));
        assert_eq!(second.1, 16);
        // The refill actually uploaded something real.
        assert!(client.get_object("bucket", &second.0).is_ok());
    }

    #[test]
    fn prime_objects_uploads_requested_count() {
        let clients: Vec<std::sync::Arc<dyn ObjectStoreClient>> =
            vec![std::sync::Arc::new(MockObjectStoreClient::new("mock-1:9000"))];
        clients[0].ensure_empty_bucket("bucket").unwrap();
        let pool = s3bench_dispatch::ClientPool::new(clients, s3bench_dispatch::SelectionPolicy::RoundRobin).unwrap();

        let keys = prime_objects(&pool, "bucket", "p/", 5, 32).unwrap();

        assert_eq!(keys.len(), 5);
        for (key, size) in &keys {
            assert_eq!(*size, 32);
            assert!(key.starts_with("p/"));
        }
    }
}
