//! In-process document store
//!
//! All records sit behind one `parking_lot::Mutex`. A commit validates its
//! preconditions, applies its writes and publishes fresh day snapshots
//! without releasing the lock and without awaiting, so a commit is never
//! half-applied and a dropped future never leaves partial state.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, trace};
use walkin_types::{Booking, BookingId, DayKey, DaySequence};

use crate::error::StoreError;
use crate::record::{Version, Versioned, ABSENT};
use crate::store::{DaySnapshot, DocumentStore, SnapshotStream};
use crate::transaction::{CommitReceipt, Precondition, Transaction, Write};

const SEQUENCES: &str = "sequences";
const BOOKINGS: &str = "bookings";

#[derive(Default)]
struct Inner {
    /// Bumped once per successful commit
    revision: u64,
    sequences: HashMap<DayKey, (DaySequence, Version)>,
    bookings: HashMap<BookingId, (Booking, Version)>,
    by_day: HashMap<DayKey, Vec<BookingId>>,
}

impl Inner {
    fn sequence_version(&self, day: DayKey) -> Version {
        self.sequences.get(&day).map_or(ABSENT, |(_, v)| *v)
    }

    fn booking_version(&self, id: &BookingId) -> Version {
        self.bookings.get(id).map_or(ABSENT, |(_, v)| *v)
    }

    fn snapshot(&self, day: DayKey) -> DaySnapshot {
        let mut bookings: Vec<Booking> = self
            .by_day
            .get(&day)
            .into_iter()
            .flatten()
            .filter_map(|id| self.bookings.get(id).map(|(b, _)| b.clone()))
            .collect();
        bookings.sort_by(|a, b| {
            (a.token_number, a.created_at, &a.id).cmp(&(b.token_number, b.created_at, &b.id))
        });
        DaySnapshot {
            day,
            revision: self.revision,
            bookings: Arc::new(bookings),
        }
    }

    /// Reject the transaction if any precondition or create fails
    fn validate(&self, tx: &Transaction) -> Result<(), StoreError> {
        for pre in tx.preconditions() {
            match pre {
                Precondition::Sequence { day, version } => {
                    if self.sequence_version(*day) != *version {
                        return Err(StoreError::conflict(SEQUENCES, day.to_string()));
                    }
                }
                Precondition::Booking { id, version } => {
                    if self.booking_version(id) != *version {
                        return Err(StoreError::conflict(BOOKINGS, id.as_str()));
                    }
                }
            }
        }
        for write in tx.writes() {
            match write {
                Write::CreateBooking(b) if self.bookings.contains_key(&b.id) => {
                    return Err(StoreError::conflict(BOOKINGS, b.id.as_str()));
                }
                Write::PutBooking(b) if !self.bookings.contains_key(&b.id) => {
                    return Err(StoreError::not_found(BOOKINGS, b.id.as_str()));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn apply(&mut self, tx: Transaction) {
        self.revision += 1;
        let version = self.revision;
        for write in tx.into_writes() {
            match write {
                Write::PutSequence(seq) => {
                    self.sequences.insert(seq.day, (seq, version));
                }
                Write::CreateBooking(b) => {
                    self.by_day.entry(b.day).or_default().push(b.id.clone());
                    self.bookings.insert(b.id.clone(), (b, version));
                }
                Write::PutBooking(b) => {
                    if let Some(old_day) = self.bookings.get(&b.id).map(|(old, _)| old.day) {
                        if old_day != b.day {
                            if let Some(ids) = self.by_day.get_mut(&old_day) {
                                ids.retain(|id| id != &b.id);
                            }
                            self.by_day.entry(b.day).or_default().push(b.id.clone());
                        }
                    }
                    self.bookings.insert(b.id.clone(), (b, version));
                }
            }
        }
    }
}

/// In-memory [`DocumentStore`]
///
/// Cheap to clone; clones share the same records.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    feeds: Arc<DashMap<DayKey, watch::Sender<DaySnapshot>>>,
    closed: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Shut the store down
    ///
    /// Further calls fail with [`StoreError::Closed`] and open snapshot
    /// streams end.
    pub fn close(&self) {
        let _inner = self.inner.lock();
        self.closed.store(true, Ordering::SeqCst);
        self.feeds.clear();
        debug!("Memory store closed");
    }

    /// Check if [`close`](Self::close) was called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Current store revision
    pub fn revision(&self) -> u64 {
        self.inner.lock().revision
    }

    /// Days with at least one open snapshot stream
    pub fn watched_days(&self) -> usize {
        self.feeds.len()
    }

    /// Total bookings across all days
    pub fn booking_count(&self) -> usize {
        self.inner.lock().bookings.len()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.is_closed() {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }

    fn commit_now(&self, tx: Transaction) -> Result<CommitReceipt, StoreError> {
        let mut inner = self.inner.lock();
        self.ensure_open()?;

        if let Err(err) = inner.validate(&tx) {
            trace!(error = %err, "Commit rejected");
            return Err(err);
        }

        let days = tx.touched_days();
        inner.apply(tx);

        // Publish while still holding the lock so watchers see commits in order
        for day in days {
            if self
                .feeds
                .remove_if(&day, |_, feed| feed.receiver_count() == 0)
                .is_some()
            {
                trace!(%day, "Dropped unwatched feed");
                continue;
            }
            if let Some(feed) = self.feeds.get(&day) {
                feed.send_replace(inner.snapshot(day));
            }
        }

        Ok(CommitReceipt {
            revision: inner.revision,
        })
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read_sequence(&self, day: DayKey) -> Result<Versioned<DaySequence>, StoreError> {
        self.ensure_open()?;
        let inner = self.inner.lock();
        Ok(match inner.sequences.get(&day) {
            Some((seq, version)) => Versioned::present(*seq, *version),
            None => Versioned::absent(),
        })
    }

    async fn read_booking(&self, id: &BookingId) -> Result<Versioned<Booking>, StoreError> {
        self.ensure_open()?;
        let inner = self.inner.lock();
        Ok(match inner.bookings.get(id) {
            Some((booking, version)) => Versioned::present(booking.clone(), *version),
            None => Versioned::absent(),
        })
    }

    async fn list_day(&self, day: DayKey) -> Result<DaySnapshot, StoreError> {
        self.ensure_open()?;
        Ok(self.inner.lock().snapshot(day))
    }

    async fn commit(&self, tx: Transaction) -> Result<CommitReceipt, StoreError> {
        self.commit_now(tx)
    }

    async fn watch_day(&self, day: DayKey) -> Result<SnapshotStream, StoreError> {
        let rx = {
            let inner = self.inner.lock();
            self.ensure_open()?;
            self.feeds.retain(|_, feed| feed.receiver_count() > 0);
            let feed = self
                .feeds
                .entry(day)
                .or_insert_with(|| watch::channel(inner.snapshot(day)).0);
            feed.subscribe()
        };

        let stream = futures::stream::unfold((rx, true), |(mut rx, first)| async move {
            if !first && rx.changed().await.is_err() {
                return None;
            }
            let snapshot = rx.borrow_and_update().clone();
            Some((snapshot, (rx, false)))
        });

        Ok(Box::pin(stream))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
