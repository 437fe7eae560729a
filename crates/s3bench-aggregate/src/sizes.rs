//! Per-type request-size analysis (§4.5 step 7): once errors are removed,
//! every operation type's successful records either all share one object
//! size (`SingleSizedRequests` — latency percentiles and a bytes/sec
//! distribution for the uniform payload) or don't (`MultiSizedRequests` —
//! the same statistics bucketed by size).

use serde::{Deserialize, Serialize};

use s3bench_bench::OperationRecord;

use crate::stats::{average, percentile};

/// Latency and throughput distribution for a set of operations that all
/// transferred the same number of bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SingleSizedRequests {
    pub obj_size: u64,
    pub requests: u64,
    pub avg_duration_millis: f64,
    pub median_duration_millis: f64,
    pub p99_duration_millis: f64,
    pub fastest_duration_millis: f64,
    pub slowest_duration_millis: f64,
    pub avg_bps: f64,
}

impl SingleSizedRequests {
    /// Build from a slice of successful records that are already known to
    /// share one `size`. Returns `None` for an empty slice (the caller is
    /// expected to have already checked `N > 0`).
    pub fn compute(records: &[OperationRecord]) -> Option<Self> {
        let size = records.first()?.size;
        let mut durations_ms: Vec<f64> = records.iter().map(duration_millis).collect();
        durations_ms.sort_by(|a, b| a.total_cmp(b));

        let bps: Vec<f64> = records
            .iter()
            .map(|r| {
                let secs = r.end.duration_since(r.start).unwrap_or_default().as_secs_f64();
                if secs > 0.0 { r.size as f64 / secs } else { 0.0 }
            })
            .collect();

        Some(SingleSizedRequests {
            obj_size: size,
            requests: records.len() as u64,
            avg_duration_millis: average(&durations_ms),
            median_duration_millis: percentile(&durations_ms, 50.0),
            p99_duration_millis: percentile(&durations_ms, 99.0),
            fastest_duration_millis: percentile(&durations_ms, 0.0),
            slowest_duration_millis: percentile(&durations_ms, 100.0),
            avg_bps: average(&bps),
        })
    }
}

/// The same distribution, bucketed by distinct object size, for a type
/// whose successful records span more than one size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MultiSizedRequests {
    pub by_size: Vec<SizeBucket>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SizeBucket {
    pub obj_size: u64,
    pub requests: u64,
    pub avg_duration_millis: f64,
    pub avg_bps: f64,
}

impl MultiSizedRequests {
    pub fn compute(records: &[OperationRecord]) -> Self {
        use std::collections::BTreeMap;

        let mut by_size: BTreeMap<u64, Vec<&OperationRecord>> = BTreeMap::new();
        for r in records {
            by_size.entry(r.size).or_default().push(r);
        }

        let buckets = by_size
            .into_iter()
            .map(|(size, recs)| {
                let durations_ms: Vec<f64> = recs.iter().map(|r| duration_millis(r)).collect();
                let bps: Vec<f64> = recs
                    .iter()
                    .map(|r| {
                        let secs = r.end.duration_since(r.start).unwrap_or_default().as_secs_f64();
                        if secs > 0.0 { r.size as f64 / secs } else { 0.0 }
                    })
                    .collect();
                SizeBucket {
                    obj_size: size,
                    requests: recs.len() as u64,
                    avg_duration_millis: average(&durations_ms),
                    avg_bps: average(&bps),
                }
            })
            .collect();

        MultiSizedRequests { by_size: buckets }
    }
}

fn duration_millis(r: &OperationRecord) -> f64 {
    r.end.duration_since(r.start).unwrap_or_default().as_secs_f64() * 1000.0
}
