//! Object store client abstraction.
//!
//! `s3bench` drives load against an S3-compatible object store through the
//! [`ObjectStoreClient`] trait. The trait is deliberately thin: benchmark
//! workers only need to put, get, and delete objects, and to empty a bucket
//! before a run starts. Everything below the trait — transport configuration,
//! request signing, credential handling — is an implementation detail of a
//! particular [`ObjectStoreClient`], not something the benchmark core depends
//! on directly.

pub mod client;
pub mod descriptor;
pub mod http;
pub mod mock;
pub mod signature;
pub mod transport;

pub use client::{GetOutcome, ObjectStoreClient, PutOutcome, StoreError};
pub use descriptor::ObjectDescriptor;
pub use http::HttpObjectStoreClient;
pub use mock::MockObjectStoreClient;
pub use signature::SignatureMethod;
pub use transport::TransportConfig;
