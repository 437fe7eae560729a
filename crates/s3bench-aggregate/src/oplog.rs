//! [`OperationLog`]: the query surface over a closed run's
//! [`OperationRecord`]s (§3's "Operation log" logical operations). The
//! aggregator is the only consumer; every method here is named after the
//! spec bullet it implements so `aggregate.rs` reads as a direct
//! transliteration of `pkg/aggregate/aggregate.go`'s `Aggregate`.

use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, SystemTime};

use s3bench_bench::{OpType, OperationRecord};

use crate::segment::{Segment, SegmentOptions};

/// An unordered multiset of [`OperationRecord`]s and the queries the
/// aggregator runs over it. Cheap to clone-by-reference: every filter
/// produces a new `OperationLog` that borrows nothing from its parent, just
/// a fresh `Vec` of cloned records, mirroring the original's value-typed
/// `bench.Operations` slice.
#[derive(Debug, Clone, Default)]
pub struct OperationLog {
    records: Vec<OperationRecord>,
}

impl OperationLog {
    pub fn new(records: Vec<OperationRecord>) -> Self {
        Self { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn as_slice(&self) -> &[OperationRecord] {
        &self.records
    }

    /// Total order by start timestamp; stable (records with an identical
    /// start timestamp keep their relative arrival order).
    pub fn sort_by_start_time(&mut self) {
        self.records.sort_by_key(|r| r.start);
    }

    /// The distinct set of operation types present, in first-seen order.
    pub fn op_types(&self) -> Vec<OpType> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for r in &self.records {
            if seen.insert(r.op_type) {
                out.push(r.op_type);
            }
        }
        out
    }

    /// True if more than one distinct type appears within the window during
    /// which every worker was concurrently active.
    pub fn is_mixed(&self) -> bool {
        let (start, end) = self.active_time_range(true);
        self.filter_inside_range(start, end).op_types().len() > 1
    }

    /// The window during which all workers were concurrently active
    /// (`all_threads = true`) or any worker was active (`all_threads =
    /// false`). An empty log has no meaningful range; both bounds are
    /// `UNIX_EPOCH`.
    pub fn active_time_range(&self, all_threads: bool) -> (SystemTime, SystemTime) {
        if self.records.is_empty() {
            return (SystemTime::UNIX_EPOCH, SystemTime::UNIX_EPOCH);
        }

        let mut per_thread: HashMap<u16, (SystemTime, SystemTime)> = HashMap::new();
        for r in &self.records {
            per_thread
                .entry(r.thread)
                .and_modify(|(min_start, max_end)| {
                    if r.start < *min_start {
                        *min_start = r.start;
                    }
                    if r.end > *max_end {
                        *max_end = r.end;
                    }
                })
                .or_insert((r.start, r.end));
        }

        if all_threads {
            // Not active until the last thread to start has started; not
            // active any more once the first thread to finish has finished.
            let start = per_thread.values().map(|(s, _)| *s).max().expect("non-empty");
            let end = per_thread.values().map(|(_, e)| *e).min().expect("non-empty");
            (start, end.max(start))
        } else {
            let start = per_thread.values().map(|(s, _)| *s).min().expect("non-empty");
            let end = per_thread.values().map(|(_, e)| *e).max().expect("non-empty");
            (start, end)
        }
    }

    /// Sub-log of records of the given `op_type`, order preserved.
    pub fn filter_by_op(&self, op_type: OpType) -> OperationLog {
        OperationLog::new(self.records.iter().filter(|r| r.op_type == op_type).cloned().collect())
    }

    /// Sub-log of records whose `endpoint` equals `endpoint`, order
    /// preserved.
    pub fn filter_by_endpoint(&self, endpoint: &str) -> OperationLog {
        OperationLog::new(self.records.iter().filter(|r| r.endpoint == endpoint).cloned().collect())
    }

    /// Sub-log of successful (non-error) records, order preserved.
    pub fn filter_successful(&self) -> OperationLog {
        OperationLog::new(self.records.iter().filter(|r| r.is_success()).cloned().collect())
    }

    /// Sub-log of error records, order preserved.
    pub fn filter_errors(&self) -> OperationLog {
        OperationLog::new(self.records.iter().filter(|r| r.is_error()).cloned().collect())
    }

    /// Sub-log of records whose start timestamp falls inside `[start,
    /// end]`, order preserved.
    pub fn filter_inside_range(&self, start: SystemTime, end: SystemTime) -> OperationLog {
        OperationLog::new(
            self.records
                .iter()
                .filter(|r| r.start >= start && r.start <= end)
                .cloned()
                .collect(),
        )
    }

    /// Min-start to max-end over the whole log.
    pub fn time_range(&self) -> (SystemTime, SystemTime) {
        if self.records.is_empty() {
            return (SystemTime::UNIX_EPOCH, SystemTime::UNIX_EPOCH);
        }
        let start = self.records.iter().map(|r| r.start).min().expect("non-empty");
        let end = self.records.iter().map(|r| r.end).max().expect("non-empty");
        (start, end)
    }

    pub fn duration(&self) -> Duration {
        let (start, end) = self.time_range();
        end.duration_since(start).unwrap_or_default()
    }

    /// Totals over the active window (§4.5): objects, bytes, and errors
    /// summed over every record, regardless of success, with the window
    /// computed via [`Self::active_time_range`].
    pub fn total(&self, all_threads: bool) -> Totals {
        let (start, end) = self.active_time_range(all_threads);
        Totals {
            start,
            end,
            objects: self.records.len() as u64,
            bytes: self.records.iter().map(|r| r.size).sum(),
            errors: self.records.iter().filter(|r| r.is_error()).count() as u64,
        }
    }

    /// Partition into fixed-duration, left-closed/right-open windows
    /// starting at `opts.from`. The trailing partial window is dropped.
    pub fn segment(&self, opts: SegmentOptions) -> Vec<Segment> {
        crate::segment::segment(&self.records, opts)
    }

    /// Distinct worker thread indices observed.
    pub fn threads(&self) -> usize {
        self.records.iter().map(|r| r.thread).collect::<BTreeSet<_>>().len()
    }

    /// Distinct endpoints observed, in first-seen order.
    pub fn endpoints(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for r in &self.records {
            if seen.insert(r.endpoint.clone()) {
                out.push(r.endpoint.clone());
            }
        }
        out
    }

    /// Alias for [`Self::endpoints`]`().len()` (§3's `Hosts` derived query).
    pub fn hosts(&self) -> usize {
        self.endpoints().len()
    }

    /// `objects_per_operation` of the first record, or 0 for an empty log.
    pub fn first_obj_per_op(&self) -> u32 {
        self.records.first().map(|r| r.objects_per_operation).unwrap_or(0)
    }

    /// True if at least two successful records have distinct sizes.
    pub fn multiple_sizes(&self) -> bool {
        let mut sizes = self.records.iter().filter(|r| r.is_success()).map(|r| r.size);
        let Some(first) = sizes.next() else {
            return false;
        };
        sizes.any(|s| s != first)
    }
}

/// A totals record summing bytes, object count, and errors over a window
/// (§3's `Total`/`Threshold`).
#[derive(Debug, Clone, Copy)]
pub struct Totals {
    pub start: SystemTime,
    pub end: SystemTime,
    pub objects: u64,
    pub bytes: u64,
    pub errors: u64,
}

impl Totals {
    pub fn duration(&self) -> Duration {
        self.end.duration_since(self.start).unwrap_or_default()
    }
}
