//! Metrics registry
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Relaxed atomics; exactness across threads is not required

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for the bridge and the resource API
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    sessions_opened: AtomicU64,
    sessions_closed: AtomicU64,
    requests_received: AtomicU64,
    messages_rejected: AtomicU64,
    aggregations_completed: AtomicU64,
    aggregations_failed: AtomicU64,
    aggregations_discarded: AtomicU64,
    lookups_issued: AtomicU64,
    lookup_failures: AtomicU64,
    replies_dropped: AtomicU64,
    origin_rejections: AtomicU64,
}

/// Point-in-time copy of every counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub sessions_opened: u64,
    pub sessions_closed: u64,
    pub active_sessions: u64,
    pub requests_received: u64,
    pub messages_rejected: u64,
    pub aggregations_completed: u64,
    pub aggregations_failed: u64,
    pub aggregations_discarded: u64,
    pub lookups_issued: u64,
    pub lookup_failures: u64,
    pub replies_dropped: u64,
    pub origin_rejections: u64,
}

macro_rules! counter {
    ($incr:ident, $field:ident) => {
        pub fn $incr(&self) {
            self.$field.fetch_add(1, Ordering::Relaxed);
        }
    };
}

impl MetricsRegistry {
    /// Create a registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    counter!(increment_sessions_opened, sessions_opened);
    counter!(increment_sessions_closed, sessions_closed);
    counter!(increment_requests, requests_received);
    counter!(increment_messages_rejected, messages_rejected);
    counter!(increment_aggregations_completed, aggregations_completed);
    counter!(increment_aggregations_failed, aggregations_failed);
    counter!(increment_aggregations_discarded, aggregations_discarded);
    counter!(increment_lookup_failures, lookup_failures);
    counter!(increment_replies_dropped, replies_dropped);
    counter!(increment_origin_rejections, origin_rejections);

    /// Count a batch of picture lookups about to be issued
    pub fn add_lookups(&self, count: u64) {
        self.lookups_issued.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let opened = self.sessions_opened.load(Ordering::Relaxed);
        let closed = self.sessions_closed.load(Ordering::Relaxed);

        MetricsSnapshot {
            sessions_opened: opened,
            sessions_closed: closed,
            active_sessions: opened.saturating_sub(closed),
            requests_received: self.requests_received.load(Ordering::Relaxed),
            messages_rejected: self.messages_rejected.load(Ordering::Relaxed),
            aggregations_completed: self.aggregations_completed.load(Ordering::Relaxed),
            aggregations_failed: self.aggregations_failed.load(Ordering::Relaxed),
            aggregations_discarded: self.aggregations_discarded.load(Ordering::Relaxed),
            lookups_issued: self.lookups_issued.load(Ordering::Relaxed),
            lookup_failures: self.lookup_failures.load(Ordering::Relaxed),
            replies_dropped: self.replies_dropped.load(Ordering::Relaxed),
            origin_rejections: self.origin_rejections.load(Ordering::Relaxed),
        }
    }
}
