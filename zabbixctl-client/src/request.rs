//! Request identifier allocation
//!
//! Every call gets a fresh, monotonically increasing identifier. The
//! transport is strictly request/response over HTTP, so identifiers are only
//! used to correlate log records with responses; they must be distinct, but
//! no ordering between concurrent callers is promised.

use std::sync::atomic::{AtomicI64, Ordering};

/// Thread-safe counter for JSON-RPC request ids
#[derive(Debug, Default)]
pub struct RequestIds {
    counter: AtomicI64,
}

impl RequestIds {
    /// Create a new counter; the first id handed out is `1`
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a new unique request id
    pub fn next_id(&self) -> i64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Last id handed out, `0` if none yet
    pub fn last_id(&self) -> i64 {
        self.counter.load(Ordering::Relaxed)
    }
}
