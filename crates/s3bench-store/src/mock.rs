//! An in-memory [`ObjectStoreClient`] used by tests (and by
//! `s3bench-cli --dry-run`, see `SPEC_FULL.md`) so the rest of the benchmark
//! pipeline can be exercised without a real S3-compatible endpoint.

use std::collections::HashMap;
use std::io::Read;
use std::sync::Mutex;

use crate::client::{GetOutcome, ObjectStoreClient, PutOutcome, StoreError};
use crate::descriptor::ObjectDescriptor;

#[derive(Default)]
struct Bucket {
    objects: HashMap<String, Vec<u8>>,
}

/// A thread-safe in-memory object store. One instance stands in for one
/// endpoint; dispatching across several endpoints means constructing several
/// `MockObjectStoreClient`s, exactly as [`HttpObjectStoreClient`](crate::HttpObjectStoreClient)
/// would be constructed once per endpoint.
pub struct MockObjectStoreClient {
    endpoint: String,
    buckets: Mutex<HashMap<String, Bucket>>,
    /// If set, every `n`th operation (by call order) fails with this error
    /// instead of succeeding. Used to exercise error-handling paths.
    pub fail_every: Option<(u64, fn() -> StoreError)>,
    calls: Mutex<u64>,
    /// When true, put_object writes one byte fewer than requested, simulating
    /// a short transfer without the underlying transport reporting an error.
    pub truncate_writes: bool,
}

impl MockObjectStoreClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            buckets: Mutex::new(HashMap::new()),
            fail_every: None,
            calls: Mutex::new(0),
            truncate_writes: false,
        }
    }

    fn maybe_fail(&self) -> Result<(), StoreError> {
        let Some((n, make_err)) = self.fail_every else {
            return Ok(());
        };

        let mut calls = self.calls.lock().unwrap();
        *calls += 1;

        if n != 0 && *calls % n == 0 {
            return Err(make_err());
        }

        Ok(())
    }
}

impl ObjectStoreClient for MockObjectStoreClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn ensure_empty_bucket(&self, bucket: &str) -> Result<(), StoreError> {
        self.buckets
            .lock()
            .unwrap()
            .insert(bucket.to_string(), Bucket::default());
        Ok(())
    }

    fn put_object(&self, bucket: &str, object: ObjectDescriptor) -> Result<PutOutcome, StoreError> {
        self.maybe_fail()?;

        let key = object.key.clone();
        let mut body = Vec::new();
        object.into_reader().read_to_end(&mut body)?;

        if self.truncate_writes && !body.is_empty() {
            body.pop();
        }

        let written = body.len() as u64;

        let mut buckets = self.buckets.lock().unwrap();
        let bucket = buckets.entry(bucket.to_string()).or_default();
        bucket.objects.insert(key, body);

        // A short write is not a transport failure; it's reported as a
        // successful transfer of fewer bytes than requested, and it's the
        // caller's job (worker.rs) to compare `bytes_written` against the
        // size it asked for.
        Ok(PutOutcome { bytes_written: written })
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<GetOutcome, StoreError> {
        self.maybe_fail()?;

        let buckets = self.buckets.lock().unwrap();
        let body = buckets
            .get(bucket)
            .and_then(|b| b.objects.get(key))
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?
            .clone();

        Ok(GetOutcome {
            bytes_read: body.len() as u64,
            body: Box::new(std::io::Cursor::new(body)),
        })
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        self.maybe_fail()?;

        if let Some(b) = self.buckets.lock().unwrap().get_mut(bucket) {
            b.objects.remove(key);
        }
        Ok(())
    }

    fn delete_prefix(&self, bucket: &str, prefix: &str) -> Result<(), StoreError> {
        if let Some(b) = self.buckets.lock().unwrap().get_mut(bucket) {
            b.objects.retain(|key, _| !key.starts_with(prefix));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_an_object() {
        let client = MockObjectStoreClient::new("mock-1:9000");
        client.ensure_empty_bucket("bucket").unwrap();

        client
            .put_object("bucket", ObjectDescriptor::random("key-1", 128))
            .unwrap();

        let got = client.get_object("bucket", "key-1").unwrap();
        assert_eq!(got.bytes_read, 128);
    }

    #[test]
    fn get_missing_key_is_not_found() {
        let client = MockObjectStoreClient::new("mock-1:9000");
        client.ensure_empty_bucket("bucket").unwrap();

        let err = client.get_object("bucket", "missing").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn truncated_write_reports_bytes_actually_written() {
        let mut client = MockObjectStoreClient::new("mock-1:9000");
        client.truncate_writes = true;
        client.ensure_empty_bucket("bucket").unwrap();

        let outcome = client
            .put_object("bucket", ObjectDescriptor::random("key-1", 64))
            .unwrap();

        assert_eq!(outcome.bytes_written, 63);
    }

    #[test]
    fn delete_prefix_removes_only_matching_keys() {
        let client = MockObjectStoreClient::new("mock-1:9000");
        client.ensure_empty_bucket("bucket").unwrap();
        client
            .put_object("bucket", ObjectDescriptor::random("run-a/obj-1", 8))
            .unwrap();
        client
            .put_object("bucket", ObjectDescriptor::random("run-b/obj-1", 8))
            .unwrap();

        client.delete_prefix("bucket", "run-a/").unwrap();

        assert!(client.get_object("bucket", "run-a/obj-1").is_err());
        assert!(client.get_object("bucket", "run-b/obj-1").is_ok());
    }

    #[test]
    fn fail_every_nth_call_injects_errors() {
        let mut client = MockObjectStoreClient::new("mock-1:9000");
        client.fail_every = Some((2, || StoreError::Transport("boom".to_string())));
        client.ensure_empty_bucket("bucket").unwrap();

        let first = client.put_object("bucket", ObjectDescriptor::random("k1", 8));
        let second = client.put_object("bucket", ObjectDescriptor::random("k2", 8));

        assert!(first.is_ok());
        assert!(second.is_err());
    }
}
