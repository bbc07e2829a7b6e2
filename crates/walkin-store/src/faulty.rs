//! Fault-injecting store wrapper for tests
//!
//! Wraps any [`DocumentStore`] and can force conflicts, simulate an outage,
//! or stretch the window between a read and the following commit so that
//! concurrent writers really do collide.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use walkin_types::{Booking, BookingId, DayKey, DaySequence};

use crate::error::StoreError;
use crate::record::Versioned;
use crate::store::{DaySnapshot, DocumentStore, SnapshotStream};
use crate::transaction::{CommitReceipt, Transaction};

/// Store wrapper with injectable failures
pub struct FaultyStore {
    inner: Arc<dyn DocumentStore>,
    /// Commits still to reject with a conflict
    pending_conflicts: AtomicU32,
    /// Reject every commit with a conflict
    always_conflict: AtomicBool,
    /// Fail every call with `Unavailable`
    unavailable: AtomicBool,
    /// Delay before forwarding a commit
    commit_delay: Mutex<Duration>,
    /// Delay after a sequence read returns
    read_delay: Mutex<Duration>,
    /// Commits received, including rejected ones
    commit_attempts: AtomicU64,
    /// Commits the inner store accepted
    commits_applied: AtomicU64,
}

impl FaultyStore {
    /// Wrap a store
    pub fn new(inner: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner,
            pending_conflicts: AtomicU32::new(0),
            always_conflict: AtomicBool::new(false),
            unavailable: AtomicBool::new(false),
            commit_delay: Mutex::new(Duration::ZERO),
            read_delay: Mutex::new(Duration::ZERO),
            commit_attempts: AtomicU64::new(0),
            commits_applied: AtomicU64::new(0),
        }
    }

    /// Reject the next `n` commits with a conflict
    pub fn inject_conflicts(&self, n: u32) {
        self.pending_conflicts.store(n, Ordering::SeqCst);
    }

    /// Reject every commit with a conflict while `on`
    pub fn conflict_always(&self, on: bool) {
        self.always_conflict.store(on, Ordering::SeqCst);
    }

    /// Fail every call with `Unavailable` while `on`
    pub fn set_unavailable(&self, on: bool) {
        self.unavailable.store(on, Ordering::SeqCst);
    }

    /// Sleep before forwarding each commit
    pub fn set_commit_delay(&self, delay: Duration) {
        *self.commit_delay.lock() = delay;
    }

    /// Sleep after each sequence read
    pub fn set_read_delay(&self, delay: Duration) {
        *self.read_delay.lock() = delay;
    }

    /// Commits received so far
    pub fn commit_attempts(&self) -> u64 {
        self.commit_attempts.load(Ordering::SeqCst)
    }

    /// Commits that reached and were accepted by the inner store
    pub fn commits_applied(&self) -> u64 {
        self.commits_applied.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("injected outage".into()))
        } else {
            Ok(())
        }
    }

    fn take_conflict(&self) -> bool {
        if self.always_conflict.load(Ordering::SeqCst) {
            return true;
        }
        self.pending_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl DocumentStore for FaultyStore {
    async fn read_sequence(&self, day: DayKey) -> Result<Versioned<DaySequence>, StoreError> {
        self.check_available()?;
        let read = self.inner.read_sequence(day).await?;
        let delay = *self.read_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(read)
    }

    async fn read_booking(&self, id: &BookingId) -> Result<Versioned<Booking>, StoreError> {
        self.check_available()?;
        self.inner.read_booking(id).await
    }

    async fn list_day(&self, day: DayKey) -> Result<DaySnapshot, StoreError> {
        self.check_available()?;
        self.inner.list_day(day).await
    }

    async fn commit(&self, tx: Transaction) -> Result<CommitReceipt, StoreError> {
        self.commit_attempts.fetch_add(1, Ordering::SeqCst);
        let delay = *self.commit_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.check_available()?;
        if self.take_conflict() {
            return Err(StoreError::conflict("injected", "commit"));
        }
        let receipt = self.inner.commit(tx).await?;
        self.commits_applied.fetch_add(1, Ordering::SeqCst);
        Ok(receipt)
    }

    async fn watch_day(&self, day: DayKey) -> Result<SnapshotStream, StoreError> {
        self.check_available()?;
        self.inner.watch_day(day).await
    }

    fn name(&self) -> &str {
        "faulty"
    }
}
