//! Operation counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by [`QueueService`](crate::QueueService)
#[derive(Debug, Default)]
pub struct ServiceStats {
    bookings_created: AtomicU64,
    conflicts_retried: AtomicU64,
    allocations_exhausted: AtomicU64,
    status_updates: AtomicU64,
    rejected_transitions: AtomicU64,
}

impl ServiceStats {
    pub(crate) fn record_booking(&self, attempts: u32) {
        self.bookings_created.fetch_add(1, Ordering::Relaxed);
        self.conflicts_retried
            .fetch_add(u64::from(attempts.saturating_sub(1)), Ordering::Relaxed);
    }

    pub(crate) fn record_exhausted(&self, attempts: u32) {
        self.allocations_exhausted.fetch_add(1, Ordering::Relaxed);
        self.conflicts_retried
            .fetch_add(u64::from(attempts.saturating_sub(1)), Ordering::Relaxed);
    }

    pub(crate) fn record_status_update(&self) {
        self.status_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected_transition(&self) {
        self.rejected_transitions.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            bookings_created: self.bookings_created.load(Ordering::Relaxed),
            conflicts_retried: self.conflicts_retried.load(Ordering::Relaxed),
            allocations_exhausted: self.allocations_exhausted.load(Ordering::Relaxed),
            status_updates: self.status_updates.load(Ordering::Relaxed),
            rejected_transitions: self.rejected_transitions.load(Ordering::Relaxed),
        }
    }
}

/// Copy of [`ServiceStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Bookings committed
    pub bookings_created: u64,
    /// Commit attempts that hit a conflict and were retried
    pub conflicts_retried: u64,
    /// Bookings that gave up after the retry budget
    pub allocations_exhausted: u64,
    /// Status changes applied
    pub status_updates: u64,
    /// Status changes rejected by the strict policy
    pub rejected_transitions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = ServiceStats::default();
        stats.record_booking(1);
        stats.record_booking(3);
        stats.record_exhausted(5);
        stats.record_status_update();
        stats.record_rejected_transition();

        let snap = stats.snapshot();
        assert_eq!(snap.bookings_created, 2);
        assert_eq!(snap.conflicts_retried, 6);
        assert_eq!(snap.allocations_exhausted, 1);
        assert_eq!(snap.status_updates, 1);
        assert_eq!(snap.rejected_transitions, 1);
    }
}
