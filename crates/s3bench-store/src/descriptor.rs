//! Objects handed to [`ObjectStoreClient::put_object`](crate::ObjectStoreClient::put_object).

use std::io::Read;

use s3bench_common::random::fill_random;

/// The default content type assigned to generated benchmark objects: random
/// bytes aren't any particular media type, and every S3-compatible store
/// accepts this as a valid `Content-Type` when none more specific applies.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A single object to be written during a benchmark run: a key, a content
/// type, and a body of exactly `size` bytes. The body is generated lazily by
/// [`RandomBody`] so that large objects don't require an equally large
/// in-memory buffer. Descriptors are single-use: `into_reader` consumes the
/// body, matching §3's "drained per request" contract.
pub struct ObjectDescriptor {
    pub key: String,
    pub size: u64,
    pub content_type: String,
    body: Box<dyn Read + Send>,
}

impl ObjectDescriptor {
    pub fn new(key: impl Into<String>, size: u64, content_type: impl Into<String>, body: Box<dyn Read + Send>) -> Self {
        Self {
            key: key.into(),
            size,
            content_type: content_type.into(),
            body,
        }
    }

    /// An object of `size` bytes filled with cryptographically random
    /// content, tagged [`DEFAULT_CONTENT_TYPE`].
    pub fn random(key: impl Into<String>, size: u64) -> Self {
        Self::new(key, size, DEFAULT_CONTENT_TYPE, Box::new(RandomBody::new(size)))
    }

    pub fn into_reader(self) -> Box<dyn Read + Send> {
        self.body
    }
}

/// A [`Read`] implementation that yields `remaining` random bytes and then EOF,
/// without ever materializing the full payload at once.
pub struct RandomBody {
    remaining: u64,
}

impl RandomBody {
    pub fn new(size: u64) -> Self {
        Self { remaining: size }
    }
}

impl Read for RandomBody {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.remaining == 0 {
            return Ok(0);
        }

        let n = (buf.len() as u64).min(self.remaining) as usize;
        fill_random(&mut buf[..n]);
        self.remaining -= n as u64;

        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_body_yields_exact_size_then_eof() {
        let mut body = RandomBody::new(10);
        let mut out = Vec::new();
        let read = std::io::Read::read_to_end(&mut body, &mut out).unwrap();

        assert_eq!(read, 10);
        assert_eq!(out.len(), 10);

        let mut extra = [0u8; 4];
        assert_eq!(body.read(&mut extra).unwrap(), 0);
    }

    #[test]
    fn random_body_respects_small_read_buffers() {
        let mut body = RandomBody::new(100);
        let mut buf = [0u8; 8];
        let mut total = 0usize;

        loop {
            let n = body.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            total += n;
        }

        assert_eq!(total, 100);
    }

    #[test]
    fn descriptor_exposes_key_and_size() {
        let desc = ObjectDescriptor::random("s3bench/abc/obj-1", 256);
        assert_eq!(desc.key, "s3bench/abc/obj-1");
        assert_eq!(desc.size, 256);
    }
}
