//! Re-exports for convenience
//!
//! Import everything you need with:
//! ```
//! use walkin_sdk::prelude::*;
//! ```

// Service
pub use crate::allocator::{BookingReceipt, BookingRequest};
pub use crate::builder::{ConfigError, QueueServiceBuilder};
pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::config::ServiceConfig;
pub use crate::service::QueueService;
pub use crate::stats::StatsSnapshot;
pub use crate::status::StatusChange;

// Types from walkin-types
pub use walkin_types::{
    Booking, BookingId, BookingStatus, Caller, DayKey, OwnerIdentity, QueueError, QueueResult,
    Recovery, Service, Session,
};

// Queue engine
pub use walkin_queue::{
    DurationTable, EtaCalculator, EtaMode, PositionEstimate, QueueProjection, QueueSummary,
    TransitionPolicy,
};

// Storage
pub use walkin_store::{DaySnapshot, DocumentStore, MemoryStore, RetryConfig, StoreError};
