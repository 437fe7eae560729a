//! The single cancellation source a benchmark run shares between its
//! external caller (CLI duration timeout, operator interrupt), the
//! collector's auto-termination monitor, and every worker.
//!
//! Grounded on `crates/server/src/worker.rs`'s `keep_running: &AtomicBool`
//! loop guard, inverted (a run is cancelled, not told to keep running) and
//! made `Clone` so the monitor thread and every worker thread can hold their
//! own handle to the same flag. Cancellation is one-way: there is no API to
//! un-cancel a token.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled() {
        assert!(!CancelToken::new().is_cancelled());
    }

    #[test]
    fn cancel_is_visible_through_clones() {
        let token = CancelToken::new();
        let clone = token.clone();

        clone.cancel();

        assert!(token.is_cancelled());
    }
}
