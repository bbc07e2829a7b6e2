//! Wall-clock access
//!
//! The day key is the local calendar date. Tests pin it with [`FixedClock`].

use chrono::{DateTime, Local, Utc};
use parking_lot::RwLock;
use walkin_types::DayKey;

/// Source of the current time and day
pub trait Clock: Send + Sync {
    /// Current instant, used for `created_at`
    fn now(&self) -> DateTime<Utc>;

    /// Current local calendar day
    fn today(&self) -> DayKey;
}

/// The system clock in the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> DayKey {
        DayKey::from_date(Local::now().date_naive())
    }
}

/// A clock pinned to a chosen day
///
/// `now()` still advances in real time so `created_at` stays ordered.
#[derive(Debug)]
pub struct FixedClock {
    day: RwLock<DayKey>,
}

impl FixedClock {
    /// Pin the clock to `day`
    pub fn new(day: DayKey) -> Self {
        Self {
            day: RwLock::new(day),
        }
    }

    /// Move the clock to another day
    pub fn set_day(&self, day: DayKey) {
        *self.day.write() = day;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> DayKey {
        *self.day.read()
    }
}
