//! The object store client contract that benchmark workers consume.

use std::io::Read;

use crate::descriptor::ObjectDescriptor;

/// Things that can go wrong talking to the object store. These are recorded
/// on the operation record that produced them; they never unwind a worker
/// thread or abort a run.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {status} from {method} {key}")]
    UnexpectedStatus {
        method: &'static str,
        key: String,
        status: u16,
    },

    #[error("short transfer: wrote {actual} of {expected} bytes")]
    ShortWrite { expected: u64, actual: u64 },

    #[error("short transfer: read {actual} of {expected} bytes")]
    ShortRead { expected: u64, actual: u64 },

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a successful `PUT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PutOutcome {
    pub bytes_written: u64,
}

/// Outcome of a successful `GET`.
pub struct GetOutcome {
    pub bytes_read: u64,
    pub body: Box<dyn Read + Send>,
}

/// A single S3-compatible endpoint capable of put/get/delete and bucket
/// maintenance. Implementations are expected to be cheap to clone or to be
/// wrapped in `Arc`; [`crate::dispatch`](s3bench_dispatch) hands workers a
/// reference, not an owned value, for the duration of a single operation.
pub trait ObjectStoreClient: Send + Sync {
    /// The endpoint this client talks to, as it should appear in reports
    /// (`host:port`).
    fn endpoint(&self) -> &str;

    /// Delete the bucket if it exists and recreate it empty. Called once per
    /// endpoint before a `Put`-family benchmark starts.
    fn ensure_empty_bucket(&self, bucket: &str) -> Result<(), StoreError>;

    fn put_object(&self, bucket: &str, object: ObjectDescriptor) -> Result<PutOutcome, StoreError>;

    fn get_object(&self, bucket: &str, key: &str) -> Result<GetOutcome, StoreError>;

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError>;

    /// Delete every object whose key starts with `prefix`. Used during
    /// cleanup to remove everything a benchmark run created.
    fn delete_prefix(&self, bucket: &str, prefix: &str) -> Result<(), StoreError>;
}
