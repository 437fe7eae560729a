//! The generalized worker loop every benchmark spawns one thread of.
//!
//! Grounded on `pkg/bench/put.go`'s `Start` goroutine body: wait on the
//! start barrier, then loop dispatching a client, performing one operation,
//! timing it, and sending the resulting [`OperationRecord`] to the
//! collector, until cancelled. `Put`/`Get`/`Delete` only differ in what the
//! "one operation" actually does, so that's the one piece parameterized
//! here via [`WorkerSource`] and [`OperationKind`] instead of being
//! re-derived per benchmark as the original does with one file per op type.

use std::time::SystemTime;

use crossbeam_channel::{Receiver, Sender};
use s3bench_dispatch::ClientPool;
use tracing::warn;

use crate::barrier;
use crate::cancel::CancelToken;
use crate::record::{OperationKind, OperationRecord};
use crate::source::WorkerSource;

/// Everything a worker thread needs, bundled so `runner.rs` can spawn one
/// thread per worker with a single `move` closure.
pub struct WorkerContext {
    pub thread_id: u16,
    pub kind: OperationKind,
    pub bucket: String,
    pub pool: std::sync::Arc<ClientPool>,
    pub cancel: CancelToken,
    pub start_wait: Receiver<()>,
    pub results: Sender<OperationRecord>,
}

/// Run one worker's loop to completion. Blocks on the start barrier first,
/// then repeatedly dispatches a client, performs `kind`'s operation against
/// `source`, and reports the outcome, until `ctx.cancel` is observed.
pub fn run_worker(ctx: WorkerContext, mut source: WorkerSource) {
    barrier::wait(&ctx.start_wait);

    while !ctx.cancel.is_cancelled() {
        let record = match (&mut source, ctx.kind) {
            (WorkerSource::Put(src), OperationKind::Put) => {
                let obj = src.next();
                let key = obj.key.clone();
                let size = obj.size;
                let (client, guard) = ctx.pool.dispatch();
                let endpoint = client.endpoint().to_string();
                let start = SystemTime::now();
                let result = client.put_object(&ctx.bucket, obj);
                let end = SystemTime::now();
                guard.release();
                let err = match result {
                    Ok(outcome) if outcome.bytes_written != size => {
                        Some(format!("short upload. want: {size}, got: {}", outcome.bytes_written))
                    }
                    Ok(_) => None,
                    Err(e) => Some(e.to_string()),
                };
                OperationRecord {
                    op_type: OperationKind::Put.as_str(),
                    thread: ctx.thread_id,
                    size,
                    file: key,
                    objects_per_operation: 1,
                    endpoint,
                    start,
                    end,
                    err: err.unwrap_or_default(),
                }
            }
            (WorkerSource::Get(src), OperationKind::Get) => {
                let (key, size) = src.next();
                let (client, guard) = ctx.pool.dispatch();
                let endpoint = client.endpoint().to_string();
                let start = SystemTime::now();
                let result = client.get_object(&ctx.bucket, &key);
                let end = SystemTime::now();
                guard.release();
                let err = match &result {
                    Ok(outcome) if outcome.bytes_read != size => {
                        Some(format!("short read. want: {size}, got: {}", outcome.bytes_read))
                    }
                    Ok(_) => None,
                    Err(e) => Some(e.to_string()),
                };
                OperationRecord {
                    op_type: OperationKind::Get.as_str(),
                    thread: ctx.thread_id,
                    size,
                    file: key,
                    objects_per_operation: 1,
                    endpoint,
                    start,
                    end,
                    err: err.unwrap_or_default(),
                }
            }
            (WorkerSource::Delete(src), OperationKind::Delete) => {
                let (client, guard) = ctx.pool.dispatch();
                let next = src.next(client.as_ref(), &ctx.bucket);
                let (key, size) = match next {
                    Ok(item) => item,
                    Err(e) => {
                        guard.release();
                        warn!(error = %e, "delete source refill failed, retrying");
                        continue;
                    }
                };
                let endpoint = client.endpoint().to_string();
                let start = SystemTime::now();
                let result = client.delete_object(&ctx.bucket, &key);
                let end = SystemTime::now();
                guard.release();
                OperationRecord {
                    op_type: OperationKind::Delete.as_str(),
                    thread: ctx.thread_id,
                    size,
                    file: key,
                    objects_per_operation: 1,
                    endpoint,
                    start,
                    end,
                    err: result.err().map(|e| e.to_string()).unwrap_or_default(),
                }
            }
            _ => unreachable!("worker source and operation kind are paired at spawn time"),
        };

        // An unbounded channel only fails to send if the collector's sink
        // thread has already exited, which only happens after every worker
        // has been joined; a worker never outlives its own send.
        let _ = ctx.results.send(record);
    }
}
