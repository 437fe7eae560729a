//! The Collector: the single sink every worker thread feeds, and (when
//! configured) the auto-termination monitor that watches the sink and
//! requests early cancellation once throughput has settled (§4.4, §5).

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::record::{OpType, OperationRecord};

/// Auto-termination configuration (§5): stop the run early once throughput
/// for `method` has stopped changing by more than `scale` across the
/// trailing `samples` windows spanning `duration`.
#[derive(Debug, Clone)]
pub struct AutoTermOptions {
    /// Operation type to watch, e.g. `"PUT"`. Mixed runs pick the
    /// operation that dominates the workload.
    pub method: OpType,
    /// Total span the trailing window covers.
    pub duration: Duration,
    /// Number of sub-windows `duration` is divided into when checking for
    /// stability. The spec's default is 10s sub-windows over a 5s duration's
    /// worth of samples; callers choose both independently.
    pub samples: u32,
    /// Stability tolerance: the run is considered to have settled once
    /// `min_throughput / max_throughput >= 1.0 - scale` across the trailing
    /// sub-windows, i.e. throughput hasn't varied by more than this
    /// fraction. A smaller `scale` demands tighter stability.
    pub scale: f64,
}

/// Receives [`OperationRecord`]s from worker threads and appends them to a
/// shared log. Workers never touch the log directly; they only hold a
/// [`Sender`] clone, so the collector is the sole owner of ordering and
/// storage.
pub struct Collector {
    sender: Sender<OperationRecord>,
    receiver: Option<Receiver<OperationRecord>>,
    log: Arc<Mutex<Vec<OperationRecord>>>,
    sink: Option<JoinHandle<()>>,
    monitor: Option<JoinHandle<()>>,
}

impl Collector {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver: Some(receiver),
            log: Arc::new(Mutex::new(Vec::new())),
            sink: None,
            monitor: None,
        }
    }

    /// A handle workers clone to report completed operations.
    pub fn sender(&self) -> Sender<OperationRecord> {
        self.sender.clone()
    }

    /// Start draining the channel into the shared log on a dedicated
    /// thread. Must be called once, before workers start sending.
    pub fn start(&mut self) {
        let receiver = self.receiver.take().expect("collector already started");
        let log = Arc::clone(&self.log);
        self.sink = Some(thread::spawn(move || {
            for record in receiver.iter() {
                log.lock().unwrap().push(record);
            }
        }));
    }

    /// Spawn the auto-termination monitor thread, which cancels `token`
    /// once throughput for `opts.method` has settled. No-op if auto-term
    /// wasn't requested; callers skip this call entirely in that case.
    pub fn auto_terminate(&mut self, opts: AutoTermOptions, token: CancelToken, run_start: Instant) {
        let log = Arc::clone(&self.log);
        self.monitor = Some(thread::spawn(move || run_auto_term_monitor(opts, token, log, run_start)));
    }

    /// Stop accepting new work and return the finished log. Callers must
    /// have already joined every worker thread (and thus dropped every
    /// sender clone a worker held) before calling this; the collector's own
    /// sender is dropped first so the sink thread's `receiver.iter()` sees
    /// the channel disconnect and returns.
    pub fn close(self) -> Vec<OperationRecord> {
        let Collector {
            sender,
            receiver: _,
            log,
            mut sink,
            mut monitor,
        } = self;
        drop(sender);

        if let Some(sink) = sink.take() {
            sink.join().expect("collector sink thread panicked");
        }
        if let Some(monitor) = monitor.take() {
            monitor.join().expect("collector auto-term monitor panicked");
        }
        Arc::try_unwrap(log)
            .expect("collector log still shared after sink and monitor joined")
            .into_inner()
            .unwrap()
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

fn run_auto_term_monitor(
    opts: AutoTermOptions,
    token: CancelToken,
    log: Arc<Mutex<Vec<OperationRecord>>>,
    run_start: Instant,
) {
    let check_interval = opts.duration / opts.samples.max(1);
    let mut window_bytes: Vec<u64> = Vec::new();
    let mut last_check = run_start;

    loop {
        thread::sleep(check_interval.min(Duration::from_millis(200)));
        if token.is_cancelled() {
            return;
        }
        let now = Instant::now();
        if now.duration_since(last_check) < check_interval {
            continue;
        }

        let window_start_wall = std::time::SystemTime::now() - check_interval.min(opts.duration);
        let bytes_in_window: u64 = {
            let log = log.lock().unwrap();
            log.iter()
                .filter(|r| r.op_type == opts.method && r.is_success() && r.end >= window_start_wall)
                .map(|r| r.size)
                .sum()
        };

        window_bytes.push(bytes_in_window);
        let max_windows = opts.samples as usize;
        if window_bytes.len() > max_windows {
            window_bytes.remove(0);
        }

        if window_bytes.len() == max_windows {
            let max = *window_bytes.iter().max().unwrap_or(&0);
            let min = *window_bytes.iter().min().unwrap_or(&0);
            if max > 0 {
                let ratio = min as f64 / max as f64;
                debug!(ratio, scale = opts.scale, "auto-term stability check");
                if ratio >= 1.0 - opts.scale {
                    info!(method = opts.method, ratio, "throughput settled, cancelling run early");
                    token.cancel();
                    return;
                }
            }
        }

        last_check = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(op_type: OpType, size: u64) -> OperationRecord {
        let now = std::time::SystemTime::now();
        OperationRecord {
            op_type,
            thread: 0,
            size,
            file: String::new(),
            objects_per_operation: 1,
            endpoint: "host:9000".to_string(),
            start: now,
            end: now,
            err: String::new(),
        }
    }

    #[test]
    fn collects_records_sent_by_multiple_workers() {
        let mut collector = Collector::new();
        collector.start();

        let senders: Vec<_> = (0..4).map(|_| collector.sender()).collect();
        let handles: Vec<_> = senders
            .into_iter()
            .map(|s| {
                thread::spawn(move || {
                    for _ in 0..10 {
                        s.send(record("PUT", 1024)).unwrap();
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        let log = collector.close();
        assert_eq!(log.len(), 40);
    }

    #[test]
    fn close_with_no_records_returns_empty_log() {
        let mut collector = Collector::new();
        collector.start();
        let log = collector.close();
        assert!(log.is_empty());
    }

    #[test]
    fn auto_terminate_cancels_once_throughput_settles() {
        let mut collector = Collector::new();
        collector.start();
        let sender = collector.sender();
        let token = CancelToken::new();

        collector.auto_terminate(
            AutoTermOptions {
                method: "PUT",
                duration: Duration::from_millis(60),
                samples: 3,
                // Generous tolerance so steady-but-jittery test timing still
                // reads as "stable": min/max must be within 50% of each
                // other across the trailing window.
                scale: 0.5,
            },
            token.clone(),
            Instant::now(),
        );

        // A steady feed, not a one-shot burst: throughput only looks
        // "settled" across consecutive sub-windows if records keep arriving
        // at roughly the same rate throughout the trailing window.
        let feed_sender = sender.clone();
        let feed_token = token.clone();
        thread::spawn(move || {
            while !feed_token.is_cancelled() {
                let _ = feed_sender.send(record("PUT", 1000));
                thread::sleep(Duration::from_millis(5));
            }
        });

        let deadline = Instant::now() + Duration::from_secs(2);
        while !token.is_cancelled() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }

        assert!(token.is_cancelled(), "monitor should have cancelled the token");
        drop(sender);
        collector.close();
    }
}
