//! End-to-end scenarios driving `s3bench_aggregate::aggregate` over
//! synthesized operation logs, covering the mixed-run report shape and
//! error-sample capping from §8.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use s3bench_aggregate::{aggregate, AggregateOptions, OperationLog};
use s3bench_bench::OperationRecord;

fn record(op_type: &'static str, thread: u16, start_ms: u64, end_ms: u64, size: u64, endpoint: &str, err: &str) -> OperationRecord {
    OperationRecord {
        op_type,
        thread,
        size,
        file: format!("obj-{thread}-{start_ms}"),
        objects_per_operation: 1,
        endpoint: endpoint.to_string(),
        start: SystemTime::UNIX_EPOCH + Duration::from_millis(start_ms),
        end: SystemTime::UNIX_EPOCH + Duration::from_millis(end_ms),
        err: err.to_string(),
    }
}

fn ten_segments(total: Duration) -> Duration {
    (total / 10).max(Duration::from_millis(1))
}

fn opts() -> AggregateOptions {
    AggregateOptions {
        prefiltered: false,
        dur_func: Arc::new(ten_segments),
        skip_dur: Duration::ZERO,
    }
}

#[test]
fn a_thousand_puts_and_gets_aggregate_into_a_mixed_report() {
    let mut records = Vec::with_capacity(2000);
    for i in 0..1000u64 {
        records.push(record("PUT", (i % 8) as u16, i, i + 5, 4096, "host-0:9000", ""));
        records.push(record("GET", (i % 8) as u16 + 8, i, i + 3, 4096, "host-1:9000", ""));
    }

    let report = aggregate(OperationLog::new(records), opts()).unwrap();

    assert!(report.mixed);
    assert!(report.mixed_server_stats.is_some());
    assert_eq!(report.operations.len(), 2);

    let put = report.operations.iter().find(|o| o.op_type == "PUT").unwrap();
    let get = report.operations.iter().find(|o| o.op_type == "GET").unwrap();
    assert_eq!(put.n, 1000);
    assert_eq!(get.n, 1000);
    assert!(!put.skipped && !get.skipped);

    // Every dispatched request landed on exactly one endpoint, and
    // per-endpoint totals must sum back to the type's total.
    let put_host_total: u64 = put.throughput_by_host.values().map(|t| t.operations).sum();
    assert_eq!(put_host_total, put.throughput.operations);
}

#[test]
fn error_samples_are_capped_at_ten_even_with_fifty_failures() {
    let mut records = Vec::with_capacity(50);
    for i in 0..50u64 {
        records.push(record("PUT", 0, i * 10, i * 10 + 5, 1024, "host-0:9000", "connection reset"));
    }

    let report = aggregate(OperationLog::new(records), opts()).unwrap();

    let put = &report.operations[0];
    assert_eq!(put.errors, 50);
    assert_eq!(put.first_errors.len(), 10);
    assert!(put.first_errors.iter().all(|e| e.contains("connection reset")));
}

#[test]
fn aggregated_report_round_trips_through_json() {
    let mut records = Vec::new();
    for i in 0..30u64 {
        records.push(record("DELETE", (i % 4) as u16, i * 5, i * 5 + 2, 0, "host-0:9000", ""));
    }

    let report = aggregate(OperationLog::new(records), opts()).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    let round_tripped: s3bench_aggregate::Aggregated = serde_json::from_str(&json).unwrap();
    assert_eq!(report, round_tripped);
}
