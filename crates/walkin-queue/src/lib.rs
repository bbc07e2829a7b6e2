//! Runtime-free queue engine for the walk-in token queue
//!
//! This crate turns a day's set of bookings into an ordered projection and
//! derives queue positions and wait estimates from it. Everything here is a
//! pure function of its inputs, so it can be driven from any runtime, a test,
//! or a UI thread.
//!
//! # Constraints
//!
//! - NO `tokio`
//! - NO storage access
//!
//! # Example
//!
//! ```
//! use walkin_queue::{EtaCalculator, QueueProjection};
//! use walkin_types::DayKey;
//!
//! let day = DayKey::parse("2024-01-01").unwrap();
//! let projection = QueueProjection::from_bookings(day, Vec::new());
//! assert!(projection.is_empty());
//!
//! let calculator = EtaCalculator::default();
//! assert_eq!(calculator.table().default_minutes(), 20);
//! ```

pub mod eta;
pub mod projection;
pub mod summary;
pub mod transition;

// Re-export main types
pub use eta::{DurationTable, EtaCalculator, EtaMode, PositionEstimate, DEFAULT_SERVICE_MINUTES};
pub use projection::QueueProjection;
pub use summary::QueueSummary;
pub use transition::TransitionPolicy;
