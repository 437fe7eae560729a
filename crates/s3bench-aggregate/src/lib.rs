//! The Operation log query surface and the aggregator that turns a closed
//! benchmark run into an [`Aggregated`] report (~35% of the core, §4.5).
//! This is the only crate in the workspace that imports `jiff` or `rayon`:
//! `jiff` for the report's calendar timestamps, `rayon` for the per-type
//! and per-endpoint fan-out `pkg/aggregate/aggregate.go` does with
//! goroutines.

pub mod aggregate;
pub mod error;
pub mod oplog;
pub mod report;
pub mod segment;
pub mod sizes;
pub mod stats;
pub mod throughput;
pub mod time;

pub use aggregate::{aggregate, default_dur_func, AggregateOptions, DurFunc};
pub use error::AggregateError;
pub use oplog::{OperationLog, Totals};
pub use report::{Aggregated, Operation, ReportKind};
pub use segment::{Segment, SegmentOptions};
pub use sizes::{MultiSizedRequests, SingleSizedRequests, SizeBucket};
pub use throughput::{Throughput, ThroughputSegmented};
