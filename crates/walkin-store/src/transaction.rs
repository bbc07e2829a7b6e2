//! Optimistic multi-record commits
//!
//! A [`Transaction`] is a list of preconditions plus a list of writes. The
//! store checks every precondition and applies every write in one step, or
//! rejects the whole transaction with
//! [`StoreError::Conflict`](crate::StoreError::Conflict) and changes nothing.

use std::collections::BTreeSet;
use walkin_types::{Booking, BookingId, DayKey, DaySequence};

use crate::record::Version;

/// Version a record must still have at commit time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// The day's sequence is at `version` (0 = never written)
    Sequence { day: DayKey, version: Version },
    /// The booking is at `version` (0 = does not exist)
    Booking { id: BookingId, version: Version },
}

/// A single record write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    /// Create or replace a day's sequence
    PutSequence(DaySequence),
    /// Create a booking; conflicts if the id is taken
    CreateBooking(Booking),
    /// Replace an existing booking; fails if it does not exist
    PutBooking(Booking),
}

impl Write {
    /// Day whose snapshot this write changes
    pub fn day(&self) -> DayKey {
        match self {
            Self::PutSequence(seq) => seq.day,
            Self::CreateBooking(b) | Self::PutBooking(b) => b.day,
        }
    }
}

/// Preconditions and writes applied atomically
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    preconditions: Vec<Precondition>,
    writes: Vec<Write>,
}

impl Transaction {
    /// Create an empty transaction
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the day's sequence to be unchanged since it was read
    pub fn expect_sequence(mut self, day: DayKey, version: Version) -> Self {
        self.preconditions
            .push(Precondition::Sequence { day, version });
        self
    }

    /// Require the booking to be unchanged since it was read
    pub fn expect_booking(mut self, id: BookingId, version: Version) -> Self {
        self.preconditions.push(Precondition::Booking { id, version });
        self
    }

    /// Write a day's sequence
    pub fn put_sequence(mut self, sequence: DaySequence) -> Self {
        self.writes.push(Write::PutSequence(sequence));
        self
    }

    /// Create a new booking
    pub fn create_booking(mut self, booking: Booking) -> Self {
        self.writes.push(Write::CreateBooking(booking));
        self
    }

    /// Replace an existing booking
    pub fn put_booking(mut self, booking: Booking) -> Self {
        self.writes.push(Write::PutBooking(booking));
        self
    }

    /// Preconditions in insertion order
    pub fn preconditions(&self) -> &[Precondition] {
        &self.preconditions
    }

    /// Writes in insertion order
    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    /// Consume the transaction, keeping only its writes
    pub fn into_writes(self) -> Vec<Write> {
        self.writes
    }

    /// Check if the transaction writes nothing
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Days whose snapshots change when this commits
    pub fn touched_days(&self) -> BTreeSet<DayKey> {
        self.writes.iter().map(Write::day).collect()
    }
}

/// Result of a successful commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Store revision after the commit
    pub revision: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_in_order() {
        let day = DayKey::parse("2024-01-01").unwrap();
        let next = day.next_day().unwrap();
        let tx = Transaction::new()
            .expect_sequence(day, 0)
            .expect_booking(BookingId::new("b1"), 3)
            .put_sequence(DaySequence::start(day).advanced_to(1))
            .put_sequence(DaySequence::start(next));

        assert_eq!(tx.preconditions().len(), 2);
        assert_eq!(tx.writes().len(), 2);
        assert!(!tx.is_empty());
        assert_eq!(tx.touched_days().into_iter().collect::<Vec<_>>(), vec![day, next]);
    }

    #[test]
    fn test_empty() {
        assert!(Transaction::new().is_empty());
        assert!(Transaction::new().touched_days().is_empty());
    }
}
