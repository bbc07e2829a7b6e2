//! Booking lifecycle state
//!
//! ```text
//! ┌─────────────┐
//! │   Queued    │───────────────────────┐
//! └──────┬──────┘                       │
//!        │ Start                        │
//!        ▼                              │
//! ┌─────────────┐                       │
//! │ In Progress │──────────────┐        │
//! └──────┬──────┘              │        │
//!        │ Complete            │ Cancel │ Cancel
//!        ▼                     ▼        ▼
//! ┌─────────────┐        ┌─────────────────┐
//! │  Completed  │        │    Cancelled    │
//! └─────────────┘        └─────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QueueError;

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Waiting for service
    #[default]
    Queued,
    /// Currently being served
    #[serde(rename = "In Progress")]
    InProgress,
    /// Served
    Completed,
    /// Withdrawn by the customer or staff
    Cancelled,
}

impl BookingStatus {
    /// Returns the display name as stored on booking records
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "Queued",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Check if the booking still occupies a place in the queue
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Queued | Self::InProgress)
    }

    /// Check if the booking is terminal (no more state changes)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Check whether the state machine allows moving to `next`
    ///
    /// Re-applying the current status is always allowed and has no effect.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (Self::Queued, Self::InProgress)
                | (Self::Queued, Self::Cancelled)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "queued" => Ok(Self::Queued),
            "in progress" | "inprogress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(QueueError::invalid_input(
                "status",
                format!("{s:?} is not a booking status"),
            )),
        }
    }
}
