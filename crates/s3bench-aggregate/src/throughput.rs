//! [`Throughput`] and [`ThroughputSegmented`]: the overall and time-resolved
//! rate figures that appear on every level of the Aggregated report (the
//! mixed server stats, each per-type summary, and each per-host entry).
//! Grounded on `pkg/aggregate/aggregate.go`'s `Throughput{}.fill(total)` /
//! `ThroughputSegmented{}.fill(segs, total)` call sites; the field shapes
//! themselves are this crate's own design since `Throughput`'s definition
//! wasn't part of the retrieved source.

use serde::{Deserialize, Serialize};

use crate::oplog::Totals;
use crate::segment::Segment;
use crate::stats::percentile;

/// Overall throughput over some window: bytes/sec and ops/sec averaged
/// across the whole window, plus an optional time-resolved breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Throughput {
    pub average_bps: f64,
    pub average_ops: f64,
    pub operations: u64,
    pub bytes: u64,
    pub errors: u64,
    pub measure_duration_millis: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segmented: Option<ThroughputSegmented>,
}

impl Throughput {
    /// Build a `Throughput` from a window's totals, with no segmented
    /// breakdown yet (callers that have >1 segment attach one afterward).
    pub fn from_totals(total: &Totals) -> Self {
        let secs = total.duration().as_secs_f64();
        let average_bps = if secs > 0.0 { total.bytes as f64 / secs } else { 0.0 };
        let average_ops = if secs > 0.0 { total.objects as f64 / secs } else { 0.0 };

        Throughput {
            average_bps,
            average_ops,
            operations: total.objects,
            bytes: total.bytes,
            errors: total.errors,
            measure_duration_millis: total.duration().as_millis() as u64,
            segmented: None,
        }
    }
}

/// Time-resolved throughput: a series of fixed-duration segments plus the
/// fastest/slowest/median segment rates, serialized with the segment
/// duration in milliseconds for portability (§4.5's "Segment duration is
/// serialized in milliseconds").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThroughputSegmented {
    pub segment_duration_millis: u64,
    pub segment_count: usize,
    pub fastest_bps: f64,
    pub fastest_ops: f64,
    pub median_bps: f64,
    pub median_ops: f64,
    pub slowest_bps: f64,
    pub slowest_ops: f64,
}

impl ThroughputSegmented {
    /// Compute a segmented breakdown from already-partitioned `segments`.
    /// Returns `None` if fewer than two segments exist (the "insufficient
    /// data" case the aggregator treats as unsegmented).
    pub fn from_segments(segments: &[Segment], segment_duration_millis: u64) -> Option<Self> {
        if segments.len() <= 1 {
            return None;
        }

        let mut bps: Vec<f64> = segments
            .iter()
            .map(|s| {
                let secs = s.duration().as_secs_f64();
                if secs > 0.0 { s.bytes as f64 / secs } else { 0.0 }
            })
            .collect();
        let mut ops: Vec<f64> = segments
            .iter()
            .map(|s| {
                let secs = s.duration().as_secs_f64();
                if secs > 0.0 { s.objects as f64 / secs } else { 0.0 }
            })
            .collect();

        bps.sort_by(|a, b| a.total_cmp(b));
        ops.sort_by(|a, b| a.total_cmp(b));

        Some(ThroughputSegmented {
            segment_duration_millis,
            segment_count: segments.len(),
            fastest_bps: percentile(&bps, 100.0),
            fastest_ops: percentile(&ops, 100.0),
            median_bps: percentile(&bps, 50.0),
            median_ops: percentile(&ops, 50.0),
            slowest_bps: percentile(&bps, 0.0),
            slowest_ops: percentile(&ops, 0.0),
        })
    }

}
