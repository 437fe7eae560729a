//! Operation records, the start barrier, the collector (with optional
//! auto-termination), per-worker object sources, the generalized worker
//! loop, and the four benchmark subclasses (`Put`/`Get`/`Delete`/`Mixed`).

pub mod barrier;
pub mod benchmarks;
pub mod cancel;
pub mod collector;
pub mod error;
pub mod record;
pub mod runner;
pub mod source;
pub mod worker;

pub use benchmarks::{Benchmark, WorkerAssignment};
pub use benchmarks::{delete::Delete, get::Get, mixed::Mixed, put::Put};
pub use cancel::CancelToken;
pub use collector::{AutoTermOptions, Collector};
pub use error::BenchError;
pub use record::{OpType, OperationKind, OperationRecord};
pub use runner::{RunOptions, RunOutcome, run};
