//! Shared types for the walk-in token queue
//!
//! This crate provides the core type definitions used across the walkin
//! workspace. It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`DayKey`] - Calendar day partition key (`YYYY-MM-DD`)
//! - [`Service`] - The fixed set of bookable services
//! - [`BookingStatus`] - Booking lifecycle state
//! - [`Booking`], [`DaySequence`] - Stored records
//! - [`Caller`], [`Session`] - Verified identity handed over by the auth provider
//! - [`QueueError`] - Error taxonomy surfaced to callers

pub mod booking;
pub mod day;
pub mod error;
pub mod identity;
pub mod service;
pub mod status;

// Re-export commonly used types
pub use booking::*;
pub use day::*;
pub use error::*;
pub use identity::*;
pub use service::*;
pub use status::*;
