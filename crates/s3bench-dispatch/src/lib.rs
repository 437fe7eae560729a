//! Host dispatch: turning a `--host` spec into a pool of per-endpoint object
//! store clients and handing them out to benchmark workers under a
//! [`SelectionPolicy`].
//!
//! This crate owns exactly the ~15% of the core described as "Client Pool /
//! Host Dispatcher": host-spec parsing and expansion, client construction is
//! left to the caller (it needs [`s3bench_store::SignatureMethod`] and
//! credentials the dispatcher itself has no opinion on), and the
//! dispatch/release contract with its round-robin and weighed policies.

pub mod error;
pub mod hostspec;
pub mod policy;
pub mod pool;

pub use error::DispatchError;
pub use hostspec::parse_hosts;
pub use policy::SelectionPolicy;
pub use pool::{ClientPool, DispatchGuard};
