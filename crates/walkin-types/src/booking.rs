//! Stored records: bookings and per-day sequences

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::day::DayKey;
use crate::identity::OwnerIdentity;
use crate::service::Service;
use crate::status::BookingStatus;

/// Length of generated booking identifiers
pub const BOOKING_ID_LEN: usize = 20;

/// Opaque unique booking identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random 20-character alphanumeric identifier
    pub fn generate() -> Self {
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(BOOKING_ID_LEN)
            .map(char::from)
            .collect();
        Self(id)
    }

    /// The raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookingId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A customer's booking for one day
///
/// `token_number` and `day` are fixed at creation; only `status` changes
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier
    pub id: BookingId,
    /// Day the token belongs to
    pub day: DayKey,
    /// Sequential token, unique within `day`, starting at 1
    pub token_number: u32,
    /// Name given by the customer
    pub customer_name: String,
    /// Contact handle (phone number)
    pub customer_contact: Option<String>,
    /// Requested service
    pub service: Service,
    /// Current status
    pub status: BookingStatus,
    /// Identity that created the booking
    pub owner: OwnerIdentity,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Check if the booking still occupies a place in the queue
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Copy of this booking with a different status
    pub fn with_status(&self, status: BookingStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

/// High-water mark of tokens handed out for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySequence {
    /// Day this sequence belongs to
    pub day: DayKey,
    /// Last token handed out; 0 before the first booking
    pub last_token_number: u32,
}

impl DaySequence {
    /// Sequence state before any booking on `day`
    pub fn start(day: DayKey) -> Self {
        Self {
            day,
            last_token_number: 0,
        }
    }

    /// The token the next booking receives, `None` on overflow
    pub fn next_token(&self) -> Option<u32> {
        self.last_token_number.checked_add(1)
    }

    /// The sequence after handing out `token`
    pub fn advanced_to(&self, token: u32) -> Self {
        Self {
            day: self.day,
            last_token_number: token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids() {
        let a = BookingId::generate();
        let b = BookingId::generate();
        assert_eq!(a.as_str().len(), BOOKING_ID_LEN);
        assert!(a.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_sequence_advance() {
        let day = DayKey::parse("2024-01-01").unwrap();
        let seq = DaySequence::start(day);
        assert_eq!(seq.next_token(), Some(1));

        let seq = seq.advanced_to(1);
        assert_eq!(seq.last_token_number, 1);
        assert_eq!(seq.next_token(), Some(2));

        let full = DaySequence {
            day,
            last_token_number: u32::MAX,
        };
        assert_eq!(full.next_token(), None);
    }

    #[test]
    fn test_booking_serde_field_names() {
        let booking = Booking {
            id: BookingId::new("b1"),
            day: DayKey::parse("2024-01-01").unwrap(),
            token_number: 7,
            customer_name: "Ana".into(),
            customer_contact: Some("+15550100".into()),
            service: Service::BeardTrim,
            status: BookingStatus::InProgress,
            owner: OwnerIdentity::new("uid-1"),
            created_at: DateTime::parse_from_rfc3339("2024-01-01T09:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let value = serde_json::to_value(&booking).unwrap();
        assert_eq!(value["day"], "2024-01-01");
        assert_eq!(value["token_number"], 7);
        assert_eq!(value["service"], "Beard Trim");
        assert_eq!(value["status"], "In Progress");

        let back: Booking = serde_json::from_value(value).unwrap();
        assert_eq!(back, booking);
    }
}
