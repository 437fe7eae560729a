//! End-to-end scenarios driving `s3bench_bench::runner::run` against a
//! `MockObjectStoreClient`, covering the short-transfer and auto-termination
//! scenarios.

use std::sync::Arc;
use std::time::Duration;

use s3bench_bench::collector::AutoTermOptions;
use s3bench_bench::{CancelToken, Put, RunOptions};
use s3bench_dispatch::{ClientPool, SelectionPolicy};
use s3bench_store::{MockObjectStoreClient, ObjectStoreClient};

#[test]
fn short_transfer_is_recorded_as_an_error_with_both_sizes() {
    let mut client = MockObjectStoreClient::new("host-0");
    client.truncate_writes = true;
    let client: Arc<dyn ObjectStoreClient> = Arc::new(client);
    let pool = Arc::new(ClientPool::new(vec![client], SelectionPolicy::RoundRobin).unwrap());

    let mut put = Put::default();
    let outcome = s3bench_bench::run(
        &mut put,
        pool,
        RunOptions {
            concurrency: 1,
            bucket: "bucket".to_string(),
            obj_size: 1024,
            duration: Duration::from_millis(30),
            autoterm: None,
        },
        CancelToken::new(),
    )
    .unwrap();

    assert!(!outcome.records.is_empty());
    assert!(outcome.records.iter().all(|r| r.is_error()));
    assert!(outcome.records.iter().all(|r| r.err.contains("short upload")));
    assert!(outcome.records.iter().all(|r| r.size == 1024));
}

#[test]
fn auto_termination_ends_the_run_before_the_duration_timeout() {
    let client: Arc<dyn ObjectStoreClient> = Arc::new(MockObjectStoreClient::new("host-0"));
    let pool = Arc::new(ClientPool::new(vec![client], SelectionPolicy::RoundRobin).unwrap());

    let mut put = Put::default();
    let started = std::time::Instant::now();
    let outcome = s3bench_bench::run(
        &mut put,
        pool,
        RunOptions {
            concurrency: 4,
            bucket: "bucket".to_string(),
            obj_size: 256,
            // A long ceiling that auto-termination should beat comfortably
            // against an in-memory mock that never actually slows down.
            duration: Duration::from_secs(30),
            autoterm: Some(AutoTermOptions {
                method: "PUT",
                duration: Duration::from_millis(100),
                samples: 4,
                // A continuous, saturating workload against an in-memory
                // mock settles quickly; 20% tolerance comfortably absorbs
                // scheduling jitter between sub-windows without requiring
                // the unrealistic exact equality a zero tolerance would.
                scale: 0.2,
            }),
        },
        CancelToken::new(),
    )
    .unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(!outcome.records.is_empty());
}

#[test]
fn no_records_are_dropped_across_many_concurrent_workers() {
    let client: Arc<dyn ObjectStoreClient> = Arc::new(MockObjectStoreClient::new("host-0"));
    let pool = Arc::new(ClientPool::new(vec![client], SelectionPolicy::RoundRobin).unwrap());

    let mut put = Put::default();
    let outcome = s3bench_bench::run(
        &mut put,
        pool,
        RunOptions {
            concurrency: 8,
            bucket: "bucket".to_string(),
            obj_size: 128,
            duration: Duration::from_millis(80),
            autoterm: None,
        },
        CancelToken::new(),
    )
    .unwrap();

    // Every emitted record's endpoint must be the one configured host, and
    // end must never precede start.
    for record in &outcome.records {
        assert_eq!(record.endpoint, "host-0");
        assert!(record.end >= record.start);
    }
}
