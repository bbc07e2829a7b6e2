//! Ordered per-day view of bookings
//!
//! Entries are kept in a `BTreeMap` keyed by `(token_number, created_at, id)`
//! so iteration is always in queue order. Tokens are unique per day, the
//! trailing key parts only give a total order if a store ever hands out
//! duplicates.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use walkin_types::{Booking, BookingId, BookingStatus, DayKey};

use crate::summary::QueueSummary;

/// Sort key for queue order
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct QueueKey {
    token_number: u32,
    created_at: DateTime<Utc>,
    id: BookingId,
}

impl QueueKey {
    fn of(booking: &Booking) -> Self {
        Self {
            token_number: booking.token_number,
            created_at: booking.created_at,
            id: booking.id.clone(),
        }
    }
}

/// Live ordered view of one day's bookings
///
/// Rebuilt from a full snapshot on every change; it has no identity of its
/// own beyond the day and the store revision it was built from.
#[derive(Debug, Clone)]
pub struct QueueProjection {
    /// Day this projection covers
    day: DayKey,
    /// Store revision the snapshot was taken at
    revision: u64,
    /// Bookings in queue order
    entries: BTreeMap<QueueKey, Booking>,
    /// Booking id to sort key
    index: HashMap<BookingId, QueueKey>,
}

impl QueueProjection {
    /// Create an empty projection
    pub fn empty(day: DayKey) -> Self {
        Self {
            day,
            revision: 0,
            entries: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    /// Build a projection from a set of bookings
    ///
    /// Bookings for other days are ignored.
    pub fn from_bookings(day: DayKey, bookings: impl IntoIterator<Item = Booking>) -> Self {
        let mut projection = Self::empty(day);
        for booking in bookings.into_iter().filter(|b| b.day == day) {
            let key = QueueKey::of(&booking);
            projection.index.insert(booking.id.clone(), key.clone());
            projection.entries.insert(key, booking);
        }
        projection
    }

    /// Tag the projection with the store revision it reflects
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    /// Day this projection covers
    pub fn day(&self) -> DayKey {
        self.day
    }

    /// Store revision the projection was built from
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of bookings, in any status
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no bookings exist
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bookings in queue order
    pub fn iter(&self) -> impl Iterator<Item = &Booking> {
        self.entries.values()
    }

    /// Bookings that still occupy a place, in queue order
    pub fn active(&self) -> impl Iterator<Item = &Booking> {
        self.entries.values().filter(|b| b.is_active())
    }

    /// Tokens in queue order
    pub fn tokens(&self) -> Vec<u32> {
        self.entries.keys().map(|k| k.token_number).collect()
    }

    /// Look up a booking by id
    pub fn get(&self, id: &BookingId) -> Option<&Booking> {
        self.index.get(id).and_then(|key| self.entries.get(key))
    }

    /// Look up a booking by token
    pub fn by_token(&self, token_number: u32) -> Option<&Booking> {
        self.entries
            .values()
            .find(|b| b.token_number == token_number)
    }

    /// Bookings with the given status, in queue order
    pub fn by_status(&self, status: BookingStatus) -> Vec<&Booking> {
        self.entries
            .values()
            .filter(|b| b.status == status)
            .collect()
    }

    /// Active bookings with a strictly smaller token than `target`
    ///
    /// `target` does not have to be part of the projection.
    pub fn ahead_of<'a>(&'a self, target: &Booking) -> impl Iterator<Item = &'a Booking> + 'a {
        let token = target.token_number;
        self.entries
            .values()
            .take_while(move |b| b.token_number < token)
            .filter(|b| b.is_active())
    }

    /// Number of active bookings ahead of `target`
    pub fn ahead_count(&self, target: &Booking) -> usize {
        self.ahead_of(target).count()
    }

    /// Booking currently being served (lowest token in progress)
    pub fn now_serving(&self) -> Option<&Booking> {
        self.entries
            .values()
            .find(|b| b.status == BookingStatus::InProgress)
    }

    /// Next booking waiting to be served
    pub fn next_up(&self) -> Option<&Booking> {
        self.entries
            .values()
            .find(|b| b.status == BookingStatus::Queued)
    }

    /// Highest token handed out so far
    pub fn last_token(&self) -> Option<u32> {
        self.entries.keys().next_back().map(|k| k.token_number)
    }

    /// Aggregate counts for a dashboard
    pub fn summary(&self) -> QueueSummary {
        QueueSummary::from_projection(self)
    }
}
