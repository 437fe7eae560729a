//! The aggregator itself (§4.5): turns a closed [`OperationLog`] into the
//! [`Aggregated`] report. A direct, idiomatic-Rust transliteration of
//! `pkg/aggregate/aggregate.go`'s `Aggregate` function — same three stages
//! (classify, mixed-run global stats, per-type fan-out), same per-type and
//! per-endpoint parallelism, same ordering of filter operations. `rayon`
//! stands in for the original's per-partition goroutines + `sync.WaitGroup`
//! + mutex-protected map fill (§4.5, §9's "per-type/per-endpoint
//! parallelism... parallel fan-out with a join barrier and mutex-protected
//! map publication" — `par_iter().map(...).collect()` into a `BTreeMap` is
//! that join barrier without needing an explicit mutex).

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use rayon::prelude::*;

use s3bench_bench::{OpType, OperationRecord};

use crate::error::AggregateError;
use crate::oplog::{OperationLog, Totals};
use crate::report::{Aggregated, Operation, ReportKind};
use crate::segment::SegmentOptions;
use crate::sizes::{MultiSizedRequests, SingleSizedRequests};
use crate::throughput::{Throughput, ThroughputSegmented};
use crate::time::ReportTimestamp;

/// A caller-supplied function mapping a window's total duration to the
/// width each segment inside it should have (§3's `Segment(opts)`,
/// `SegmentDurFn` in the original). `Arc`-wrapped so it can be shared
/// across the aggregator's parallel per-type and per-endpoint fan-out.
pub type DurFunc = Arc<dyn Fn(Duration) -> Duration + Send + Sync>;

/// Knobs controlling how a log is aggregated (§4.5's `Options`).
#[derive(Clone)]
pub struct AggregateOptions {
    /// True if the log passed in has already been filtered down to a
    /// single host/time-window by the caller, which disables the
    /// `allThreads` active-window totals the way a mixed run does.
    pub prefiltered: bool,
    pub dur_func: DurFunc,
    /// Warm-up window discarded from the start of each analyzed range.
    pub skip_dur: Duration,
}

impl AggregateOptions {
    /// Build options using [`default_dur_func`] for segmentation.
    pub fn new(prefiltered: bool, skip_dur: Duration) -> Self {
        Self {
            prefiltered,
            dur_func: Arc::new(default_dur_func),
            skip_dur,
        }
    }
}

/// Aim for roughly ten segments per window, never narrower than one
/// second — the "total / target-segment-count clamped to a minimum" rule
/// §4.5 describes, with the target and floor chosen to match typical
/// minute-scale benchmark runs.
pub fn default_dur_func(total: Duration) -> Duration {
    const TARGET_SEGMENTS: u32 = 10;
    const MIN_SEGMENT: Duration = Duration::from_secs(1);

    if total.is_zero() {
        return MIN_SEGMENT;
    }
    (total / TARGET_SEGMENTS).max(MIN_SEGMENT)
}

/// Turn a closed operation log into the Aggregated report. Fails only if
/// `log` is empty; every other edge case (a type with no successful
/// records, too little data to segment) is represented in the report
/// itself via `skipped`, per §8's boundary behaviors.
pub fn aggregate(mut log: OperationLog, opts: AggregateOptions) -> Result<Aggregated, AggregateError> {
    if log.is_empty() {
        return Err(AggregateError::EmptyLog);
    }

    log.sort_by_start_time();
    let types = log.op_types();
    let is_mixed = log.is_mixed();

    let (mixed_server_stats, mixed_throughput_by_host) = if is_mixed {
        let (throughput, by_host) = mixed_stats(&log, &opts);
        (Some(throughput), Some(by_host))
    } else {
        (None, None)
    };

    let operations: Vec<Operation> = types
        .par_iter()
        .map(|op_type| operation_stats(&log, *op_type, is_mixed, &opts))
        .collect();

    Ok(Aggregated {
        kind: if is_mixed { ReportKind::Mixed } else { ReportKind::Single },
        mixed: is_mixed,
        mixed_server_stats,
        mixed_throughput_by_host,
        operations,
    })
}

/// §4.5 step 2: global stats for a mixed run, over the window during which
/// every worker was concurrently active, past the warm-up discard.
fn mixed_stats(log: &OperationLog, opts: &AggregateOptions) -> (Throughput, BTreeMap<String, Throughput>) {
    let (range_start, range_end) = log.active_time_range(true);
    let start = range_start + opts.skip_dur;

    let filtered = log.filter_inside_range(start, range_end);
    let total = filtered.total(false);
    let mut throughput = Throughput::from_totals(&total);

    let segment_dur = (opts.dur_func)(total.duration());
    let segs = log.segment(SegmentOptions {
        from: start,
        per_seg_duration: segment_dur,
        all_threads: true,
        multi_op: true,
    });
    if segs.len() > 1 {
        throughput.segmented = ThroughputSegmented::from_segments(&segs, segment_dur.as_millis() as u64);
    }

    let endpoints = filtered.endpoints();
    let by_host: BTreeMap<String, Throughput> = endpoints
        .par_iter()
        .map(|ep| {
            let ops = filtered.filter_by_endpoint(ep);
            (ep.clone(), Throughput::from_totals(&ops.total(false)))
        })
        .collect();

    (throughput, by_host)
}

/// §4.5 step 3: one operation type's summary.
fn operation_stats(log: &OperationLog, op_type: OpType, is_mixed: bool, opts: &AggregateOptions) -> Operation {
    let mut ops = log.filter_by_op(op_type);

    if !opts.skip_dur.is_zero() {
        let (start, end) = ops.time_range();
        ops = ops.filter_inside_range(start + opts.skip_dur, end);
    }

    let errors = ops.filter_errors();
    let error_count = errors.len() as u64;
    let first_errors: Vec<String> = errors.as_slice().iter().take(10).map(format_error_sample).collect();

    // Errors are removed from the remainder of the analysis, but
    // per-endpoint throughput still wants them (`all_ops`, below).
    let all_ops = ops.clone();
    let successful = ops.filter_successful();

    if successful.is_empty() {
        return skipped_operation(op_type, error_count, first_errors);
    }

    let all_threads = !is_mixed && !opts.prefiltered;

    // The original segments each type's successful ops from an unbounded
    // start (Go's zero `time.Time{}`), which this reads as "start wherever
    // this type's own filtered data starts" rather than the mixed run's
    // shared active-range start.
    let segment_from = successful.time_range().0;
    let segment_dur = (opts.dur_func)(successful.duration());
    let segs = successful.segment(SegmentOptions {
        from: segment_from,
        per_seg_duration: segment_dur,
        all_threads,
        multi_op: false,
    });

    let n = successful.len() as u64;
    if segs.len() <= 1 {
        let mut op = skipped_operation(op_type, error_count, first_errors);
        op.n = n;
        return op;
    }

    let total = successful.total(all_threads);
    let (start_time, end_time) = successful.time_range();
    let mut throughput = Throughput::from_totals(&total);
    throughput.segmented = ThroughputSegmented::from_segments(&segs, segment_dur.as_millis() as u64);

    let (single_sized_requests, multi_sized_requests) = if !successful.multiple_sizes() {
        (SingleSizedRequests::compute(successful.as_slice()), None)
    } else {
        (None, Some(MultiSizedRequests::compute(successful.as_slice())))
    };

    let endpoints = all_ops.endpoints();
    let throughput_by_host: BTreeMap<String, Throughput> = endpoints
        .par_iter()
        .map(|ep| (ep.clone(), endpoint_throughput(&all_ops, ep, segment_dur)))
        .collect();

    Operation {
        op_type: op_type.to_string(),
        n,
        skipped: false,
        start_time: ReportTimestamp::from_system_time(start_time),
        end_time: ReportTimestamp::from_system_time(end_time),
        objects_per_operation: successful.first_obj_per_op(),
        concurrency: successful.threads(),
        hosts: successful.hosts(),
        single_sized_requests,
        multi_sized_requests,
        errors: error_count,
        first_errors,
        throughput,
        throughput_by_host,
    }
}

/// §4.5 step 8: one endpoint's throughput for a type, computed over every
/// dispatched operation (including errors) so per-host totals reflect
/// observed attempts rather than just successes.
fn endpoint_throughput(all_ops: &OperationLog, endpoint: &str, segment_dur: Duration) -> Throughput {
    let ep_ops = all_ops.filter_by_endpoint(endpoint);
    let total = ep_ops.total(false);
    let mut throughput = Throughput::from_totals(&total);

    let segs = ep_ops.segment(SegmentOptions {
        from: ep_ops.time_range().0,
        per_seg_duration: segment_dur,
        all_threads: false,
        multi_op: false,
    });
    if segs.len() > 1 {
        throughput.segmented = ThroughputSegmented::from_segments(&segs, segment_dur.as_millis() as u64);
    }

    throughput
}

fn skipped_operation(op_type: OpType, error_count: u64, first_errors: Vec<String>) -> Operation {
    Operation {
        op_type: op_type.to_string(),
        n: 0,
        skipped: true,
        start_time: ReportTimestamp::from_system_time(UNIX_EPOCH),
        end_time: ReportTimestamp::from_system_time(UNIX_EPOCH),
        objects_per_operation: 0,
        concurrency: 0,
        hosts: 0,
        single_sized_requests: None,
        multi_sized_requests: None,
        errors: error_count,
        first_errors,
        throughput: Throughput::from_totals(&Totals {
            start: UNIX_EPOCH,
            end: UNIX_EPOCH,
            objects: 0,
            bytes: 0,
            errors: error_count,
        }),
        throughput_by_host: BTreeMap::new(),
    }
}

/// `"<endpoint>, <end-time rounded to the second>, <error>"` (§8's error
/// sampling scenario).
fn format_error_sample(r: &OperationRecord) -> String {
    let since_epoch = r.end.duration_since(UNIX_EPOCH).unwrap_or_default();
    let rounded_secs = if since_epoch.subsec_millis() >= 500 {
        since_epoch.as_secs() + 1
    } else {
        since_epoch.as_secs()
    };
    let rounded = jiff::Timestamp::from_second(rounded_secs as i64).unwrap_or(jiff::Timestamp::from_second(0).expect("zero is a valid timestamp"));
    format!("{}, {}, {}", r.endpoint, rounded, r.err)
}
