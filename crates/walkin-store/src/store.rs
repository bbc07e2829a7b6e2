//! The storage trait

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;
use walkin_types::{Booking, BookingId, DayKey, DaySequence};

use crate::error::StoreError;
use crate::record::Versioned;
use crate::transaction::{CommitReceipt, Transaction};

/// All bookings of one day as of a store revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySnapshot {
    /// Day covered
    pub day: DayKey,
    /// Store revision the snapshot reflects
    pub revision: u64,
    /// Bookings in token order
    pub bookings: Arc<Vec<Booking>>,
}

impl DaySnapshot {
    /// Snapshot of a day with no bookings
    pub fn empty(day: DayKey, revision: u64) -> Self {
        Self {
            day,
            revision,
            bookings: Arc::new(Vec::new()),
        }
    }

    /// Find a booking by id
    pub fn find(&self, id: &BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|b| &b.id == id)
    }
}

/// Live stream of day snapshots
///
/// The first item is the state at subscription time; later items follow each
/// commit that touches the day. Intermediate snapshots may be skipped if the
/// consumer is slow, the latest one is never lost. The stream ends when the
/// store shuts down.
pub type SnapshotStream = BoxStream<'static, DaySnapshot>;

/// Trait for the persistent document store
///
/// Implementations must apply each [`Transaction`] atomically: either every
/// precondition holds and every write is applied, or nothing changes.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the sequence record for a day
    async fn read_sequence(&self, day: DayKey) -> Result<Versioned<DaySequence>, StoreError>;

    /// Read a booking by id
    async fn read_booking(&self, id: &BookingId) -> Result<Versioned<Booking>, StoreError>;

    /// Current snapshot of a day
    async fn list_day(&self, day: DayKey) -> Result<DaySnapshot, StoreError>;

    /// Apply a transaction atomically
    async fn commit(&self, tx: Transaction) -> Result<CommitReceipt, StoreError>;

    /// Subscribe to a day's snapshots
    async fn watch_day(&self, day: DayKey) -> Result<SnapshotStream, StoreError>;

    /// Short backend name for logs
    fn name(&self) -> &str;
}
