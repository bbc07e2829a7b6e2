//! Document store seam for the walk-in token queue
//!
//! The queue keeps two kinds of records: one [`DaySequence`] per day holding
//! the last token handed out, and one [`Booking`] per customer. Both live
//! behind the [`DocumentStore`] trait, which offers:
//!
//! - versioned point reads
//! - optimistic multi-record commits ([`Transaction`]) that either apply
//!   every write or none of them
//! - a live snapshot stream per day
//!
//! [`MemoryStore`] is the in-process implementation. With the `test-utils`
//! feature, [`FaultyStore`] wraps any store to inject conflicts, outages and
//! latency.
//!
//! # Example
//!
//! ```
//! use walkin_store::{DocumentStore, MemoryStore, Transaction};
//! use walkin_types::{DayKey, DaySequence};
//!
//! # async fn example() -> Result<(), walkin_store::StoreError> {
//! let store = MemoryStore::new();
//! let day = DayKey::parse("2024-01-01").unwrap();
//!
//! let current = store.read_sequence(day).await?;
//! let tx = Transaction::new()
//!     .expect_sequence(day, current.version)
//!     .put_sequence(DaySequence::start(day).advanced_to(1));
//! store.commit(tx).await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`DaySequence`]: walkin_types::DaySequence
//! [`Booking`]: walkin_types::Booking

pub mod error;
pub mod memory;
pub mod record;
pub mod retry;
pub mod store;
pub mod transaction;

#[cfg(any(test, feature = "test-utils"))]
pub mod faulty;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use record::{Version, Versioned};
pub use retry::{retry_on_conflict, RetryConfig};
pub use store::{DaySnapshot, DocumentStore, SnapshotStream};
pub use transaction::{CommitReceipt, Precondition, Transaction, Write};

#[cfg(any(test, feature = "test-utils"))]
pub use faulty::FaultyStore;
