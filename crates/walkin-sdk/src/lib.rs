//! High-level SDK for the walk-in token queue
//!
//! Customers take a daily token for a service and watch their live position;
//! staff move bookings through `Queued → In Progress → Completed` (or
//! `Cancelled`) and watch the whole day's queue.
//!
//! # Quick Start
//!
//! ```no_run
//! use futures::StreamExt;
//! use walkin_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = QueueService::builder().build()?;
//!     let caller = Caller::verified("uid-1", "+15550100");
//!
//!     let receipt = service
//!         .book(&caller, BookingRequest::new("Ana", Service::Haircut))
//!         .await?;
//!     println!("Your token is #{}", receipt.token_number);
//!
//!     let mut position = service.watch_position(&receipt.booking_id).await?;
//!     while let Some(estimate) = position.next().await {
//!         println!("{} ahead, ~{} min", estimate.ahead_count, estimate.eta_minutes);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - **Gap-free tokens**: per-day sequence advanced by optimistic commits,
//!   retried with exponential backoff on conflict
//! - **Atomic booking**: token and booking record commit together
//! - **Live views**: restartable snapshot streams per day and per booking
//! - **Pluggable storage and clock**: [`DocumentStore`] and [`Clock`] traits

pub mod allocator;
pub mod builder;
pub mod clock;
pub mod config;
pub mod prelude;
pub mod service;
pub mod stats;
pub mod status;

// Re-export main types
pub use allocator::{BookingReceipt, BookingRequest};
pub use builder::{ConfigError, QueueServiceBuilder};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ServiceConfig;
pub use service::{BookingStream, PositionStream, ProjectionStream, QueueService};
pub use stats::StatsSnapshot;
pub use status::StatusChange;

// Re-export commonly used types from dependencies
pub use walkin_queue::{DurationTable, EtaMode, PositionEstimate, QueueProjection, QueueSummary, TransitionPolicy};
pub use walkin_store::{DocumentStore, MemoryStore, RetryConfig};
pub use walkin_types::{Booking, BookingId, BookingStatus, Caller, DayKey, QueueError, QueueResult, Service, Session};
