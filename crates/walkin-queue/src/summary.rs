//! Per-day counts for staff views

use serde::{Deserialize, Serialize};
use std::fmt;
use walkin_types::{BookingStatus, DayKey};

use crate::projection::QueueProjection;

/// Aggregate state of one day's queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSummary {
    /// Day summarised
    pub day: DayKey,
    /// Bookings in any status
    pub total: usize,
    /// Waiting
    pub queued: usize,
    /// Being served
    pub in_progress: usize,
    /// Done
    pub completed: usize,
    /// Cancelled
    pub cancelled: usize,
    /// Token currently being served
    pub now_serving: Option<u32>,
    /// Next waiting token
    pub next_up: Option<u32>,
    /// Highest token handed out
    pub last_token: Option<u32>,
}

impl QueueSummary {
    /// Summarise a projection
    pub fn from_projection(projection: &QueueProjection) -> Self {
        let mut summary = Self {
            day: projection.day(),
            total: projection.len(),
            queued: 0,
            in_progress: 0,
            completed: 0,
            cancelled: 0,
            now_serving: projection.now_serving().map(|b| b.token_number),
            next_up: projection.next_up().map(|b| b.token_number),
            last_token: projection.last_token(),
        };
        for booking in projection.iter() {
            match booking.status {
                BookingStatus::Queued => summary.queued += 1,
                BookingStatus::InProgress => summary.in_progress += 1,
                BookingStatus::Completed => summary.completed += 1,
                BookingStatus::Cancelled => summary.cancelled += 1,
            }
        }
        summary
    }

    /// Bookings still waiting or being served
    pub fn active(&self) -> usize {
        self.queued + self.in_progress
    }
}

impl fmt::Display for QueueSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} total, {} queued, {} in progress, {} completed, {} cancelled",
            self.day, self.total, self.queued, self.in_progress, self.completed, self.cancelled
        )?;
        if let Some(token) = self.now_serving {
            write!(f, ", serving #{token}")?;
        }
        Ok(())
    }
}
