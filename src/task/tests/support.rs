//! Shared fixtures for task unit tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::Mutex;

/// Deterministic clock whose time only moves when explicitly advanced.
pub struct SteppingClock {
    now: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    /// Creates a clock pinned to the given instant.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Creates a clock pinned to an arbitrary fixed instant.
    pub fn fixed() -> Self {
        Self::at(start_instant())
    }

    /// Moves the clock forward by whole seconds.
    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock().expect("clock lock");
        *now += chrono::Duration::seconds(secs);
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

/// Fixed starting instant for deterministic tests.
pub fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid fixed instant")
}
