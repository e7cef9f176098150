use std::{fmt, iter::Sum, ops::Add};

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Days a book may be kept without a fine
pub const LOAN_PERIOD_DAYS: f64 = 14.0;

/// Currency units charged per overdue day
pub const DAILY_RATE: f64 = 0.5;

/// Milliseconds in one day
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// An amount owed, in currency units
///
/// Kept unrounded for arithmetic; displays and serializes rounded to cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Fine(f64);

impl Fine {
    /// Nothing owed
    pub const ZERO: Self = Self(0.0);

    /// Unrounded amount
    #[must_use]
    pub fn amount(self) -> f64 {
        self.0
    }

    /// Amount rounded to cents
    #[must_use]
    pub fn cents(self) -> f64 {
        (self.0 * 100.0).round() / 100.0
    }

    /// Whether nothing is owed
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl Add for Fine {
    type Output = Self;

    #[allow(clippy::arithmetic_side_effects)]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Fine {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Fine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.cents())
    }
}

impl fmt::Display for Fine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Fractional days between `borrowed_at` and `now`; negative under clock skew
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn elapsed_days(borrowed_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    now.signed_duration_since(borrowed_at).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Fine owed for a single loan as of `now`
///
/// A loan is free for [`LOAN_PERIOD_DAYS`]; every day past that costs
/// [`DAILY_RATE`], with partial days charged proportionally.
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn overdue_fine(borrowed_at: DateTime<Utc>, now: DateTime<Utc>) -> Fine {
    let days = elapsed_days(borrowed_at, now);
    if days > LOAN_PERIOD_DAYS { Fine((days - LOAN_PERIOD_DAYS) * DAILY_RATE) } else { Fine::ZERO }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().unwrap_or_default()
    }

    #[test]
    fn test_no_fine_within_loan_period() {
        assert_eq!(overdue_fine(start(), start()), Fine::ZERO);
        assert_eq!(overdue_fine(start(), start() + TimeDelta::days(10)), Fine::ZERO);
        assert_eq!(overdue_fine(start(), start() + TimeDelta::days(14)), Fine::ZERO);
    }

    #[test]
    fn test_fine_after_twenty_days() {
        let fine = overdue_fine(start(), start() + TimeDelta::days(20));
        assert!((fine.amount() - 3.0).abs() < f64::EPSILON);
        assert_eq!(fine.to_string(), "3.00");
    }

    #[test]
    fn test_partial_days_are_proportional() {
        let fine = overdue_fine(start(), start() + TimeDelta::days(15) + TimeDelta::hours(12));
        assert!((fine.amount() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_clock_skew_yields_zero() {
        assert_eq!(overdue_fine(start(), start() - TimeDelta::days(30)), Fine::ZERO);
    }

    #[test]
    fn test_fines_sum() {
        let total: Fine = [Fine(1.25), Fine(0.5), Fine::ZERO].into_iter().sum();
        assert_eq!(total.to_string(), "1.75");
        assert!((total.cents() - 1.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serializes_rounded_to_cents() {
        let fine = overdue_fine(start(), start() + TimeDelta::days(15) + TimeDelta::hours(13));
        assert!(fine.amount() > 0.77 && fine.amount() < 0.78);
        assert_eq!(serde_json::to_string(&fine).ok().as_deref(), Some("0.77"));
    }
}
