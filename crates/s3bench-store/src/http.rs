//! A minimal S3-compatible HTTP client.
//!
//! Full S3 semantics (multipart uploads, XML `ListObjectsV2` pagination,
//! canonical SigV4 request signing) are out of scope for a load generator;
//! this client speaks the subset of the REST API needed to put, get, and
//! delete objects and to enumerate a prefix for cleanup.

use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;
use ureq::Agent;

use crate::client::{GetOutcome, ObjectStoreClient, PutOutcome, StoreError};
use crate::descriptor::ObjectDescriptor;
use crate::signature::Signer;
use crate::transport::TransportConfig;

/// Wraps a body reader to count the bytes actually read off it, so
/// `put_object` can report what was really transferred rather than echoing
/// back the size the caller asked for — a short write (the peer closing the
/// connection mid-upload, a proxy truncating the body) must be observable
/// through the returned byte count, not assumed away.
struct CountingReader<R> {
    inner: R,
    read: Arc<AtomicU64>,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.read.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

pub struct HttpObjectStoreClient {
    endpoint: String,
    scheme: &'static str,
    agent: Agent,
    signer: Signer,
}

impl HttpObjectStoreClient {
    pub fn new(endpoint: impl Into<String>, tls: bool, transport: &TransportConfig, signer: Signer) -> Self {
        Self {
            endpoint: endpoint.into(),
            scheme: if tls { "https" } else { "http" },
            agent: transport.build_agent(),
            signer,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}://{}{}", self.scheme, self.endpoint, path)
    }

    fn authorization_header(&self, method: &str, path: &str) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;

        self.signer.sign(method, path, now)
    }
}

impl ObjectStoreClient for HttpObjectStoreClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn ensure_empty_bucket(&self, bucket: &str) -> Result<(), StoreError> {
        let path = format!("/{bucket}");

        self.delete_prefix(bucket, "")?;

        let resp = self
            .agent
            .put(self.url(&path))
            .header("Authorization", self.authorization_header("PUT", &path))
            .send_empty();

        match resp {
            Ok(_) => Ok(()),
            // bucket may already exist, which is fine for our purposes
            Err(ureq::Error::StatusCode(409)) => Ok(()),
            Err(err) => Err(StoreError::Transport(err.to_string())),
        }
    }

    fn put_object(&self, bucket: &str, object: ObjectDescriptor) -> Result<PutOutcome, StoreError> {
        let path = format!("/{bucket}/{}", object.key);
        let size = object.size;
        let key = object.key.clone();
        let content_type = object.content_type.clone();
        let body = object.into_reader();
        let bytes_read = Arc::new(AtomicU64::new(0));
        let counted_body = CountingReader {
            inner: body,
            read: Arc::clone(&bytes_read),
        };

        let response = self
            .agent
            .put(self.url(&path))
            .header("Authorization", self.authorization_header("PUT", &path))
            .header("Content-Type", &content_type)
            .header("Content-Length", size.to_string())
            .send(ureq::SendBody::from_reader(counted_body))
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(StoreError::UnexpectedStatus {
                method: "PUT",
                key,
                status,
            });
        }

        Ok(PutOutcome {
            bytes_written: bytes_read.load(Ordering::Relaxed),
        })
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<GetOutcome, StoreError> {
        let path = format!("/{bucket}/{key}");

        let response = self
            .agent
            .get(self.url(&path))
            .header("Authorization", self.authorization_header("GET", &path))
            .call();

        let mut response = match response {
            Ok(r) => r,
            Err(ureq::Error::StatusCode(404)) => return Err(StoreError::NotFound(key.to_string())),
            Err(err) => return Err(StoreError::Transport(err.to_string())),
        };

        let body = response.body_mut().as_reader();
        let mut buf = Vec::new();
        let read = body.take(u64::MAX).read_to_end(&mut buf)?;

        debug!(key, bytes = read, "get_object complete");

        Ok(GetOutcome {
            bytes_read: read as u64,
            body: Box::new(std::io::Cursor::new(buf)),
        })
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        let path = format!("/{bucket}/{key}");

        self.agent
            .delete(self.url(&path))
            .header("Authorization", self.authorization_header("DELETE", &path))
            .call()
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        Ok(())
    }

    fn delete_prefix(&self, bucket: &str, prefix: &str) -> Result<(), StoreError> {
        // A real client would page through ListObjectsV2 XML and delete each
        // key; this issues a single DELETE against the prefix path instead,
        // which only removes anything on backends that expose a bulk
        // delete-by-prefix endpoint. A 404 (nothing there) is not an error.
        let path = format!("/{bucket}/{prefix}");

        match self
            .agent
            .delete(self.url(&path))
            .header("Authorization", self.authorization_header("DELETE", &path))
            .call()
        {
            Ok(_) | Err(ureq::Error::StatusCode(404)) => Ok(()),
            Err(err) => Err(StoreError::Transport(err.to_string())),
        }
    }
}
