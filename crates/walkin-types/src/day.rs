//! Calendar day key used to partition sequences and queues

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QueueError;

/// Calendar day in `YYYY-MM-DD` form
///
/// Only the canonical zero-padded representation is accepted, so two keys
/// for the same day always compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Format string for the key representation
    pub const FORMAT: &'static str = "%Y-%m-%d";

    /// Parse a day key, rejecting non-canonical or impossible dates
    pub fn parse(s: &str) -> Result<Self, QueueError> {
        let date = NaiveDate::parse_from_str(s, Self::FORMAT)
            .map_err(|e| QueueError::invalid_input("day", format!("{s:?} is not a date: {e}")))?;

        let key = Self(date);
        if key.to_string() != s {
            return Err(QueueError::invalid_input(
                "day",
                format!("{s:?} must be written as YYYY-MM-DD"),
            ));
        }
        Ok(key)
    }

    /// Build a key from a date
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The underlying date
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The following day
    pub fn next_day(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DayKey {
    type Error = QueueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DayKey> for String {
    fn from(day: DayKey) -> Self {
        day.to_string()
    }
}
