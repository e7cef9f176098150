use std::{fmt, sync::Arc};

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

/// Source of the current time for borrow stamps and fine computation
pub trait Clock: fmt::Debug + Send {
    /// The current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
///
/// Clones share the same instant, so a test can keep a handle while the
/// desk owns another and advance time between operations.
#[derive(Debug, Clone)]
pub struct ManualClock {
    /// Shared current instant
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Create a clock stopped at `start`
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(start)) }
    }

    /// Jump to `at`, forwards or backwards
    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock() = at;
    }

    /// Move the clock by `by`; a step past the representable range leaves
    /// the clock where it is
    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock();
        if let Some(later) = now.checked_add_signed(by) {
            *now = later;
        }
    }

    /// Move the clock by whole days; out-of-range counts leave it unchanged
    pub fn advance_days(&self, days: i64) {
        if let Some(by) = TimeDelta::try_days(days) {
            self.advance(by);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_manual_clock_clones_share_time() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default();
        let clock = ManualClock::new(start);
        let handle = clock.clone();

        handle.advance_days(3);
        assert_eq!(clock.now(), start + TimeDelta::days(3));

        handle.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_out_of_range_advance_leaves_clock_unchanged() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default();
        let clock = ManualClock::new(start);

        clock.advance_days(i64::MAX);
        assert_eq!(clock.now(), start);
        clock.advance(TimeDelta::MAX);
        assert_eq!(clock.now(), start);
    }
}
