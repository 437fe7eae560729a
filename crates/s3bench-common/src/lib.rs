//! Primitives shared across the `s3bench` crates: randomness, object naming,
//! and multi-format decoding of keys/credentials supplied on the command line.

pub mod encoding;
pub mod naming;
pub mod random;

pub use encoding::try_decode;
pub use naming::{random_object_name, random_prefix};
pub use random::random_bytes;
