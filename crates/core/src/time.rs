use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── DATE KEY ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateKeyError {
    #[error("invalid date key: {0}")]
    Invalid(String),
}

/// A local calendar day, the sole time granularity for streaks, goals, and
/// forecasting.
///
/// Serializes as `YYYY-MM-DD`, which also makes it usable as a JSON map key
/// in the persisted progress blob.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Creates a date key from calendar components.
    ///
    /// Returns `None` for out-of-range dates (e.g. February 30th).
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Adds (or subtracts) whole calendar days with month/year carry.
    ///
    /// Saturates at the chrono date range limits rather than wrapping.
    #[must_use]
    pub fn add_days(&self, amount: i64) -> Self {
        let shifted = if amount >= 0 {
            self.0
                .checked_add_days(Days::new(amount.unsigned_abs()))
                .unwrap_or(NaiveDate::MAX)
        } else {
            self.0
                .checked_sub_days(Days::new(amount.unsigned_abs()))
                .unwrap_or(NaiveDate::MIN)
        };
        Self(shifted)
    }

    #[must_use]
    pub fn yesterday(&self) -> Self {
        self.add_days(-1)
    }

    /// Returns true when `self` is exactly the calendar day after `other`.
    #[must_use]
    pub fn is_day_after(&self, other: DateKey) -> bool {
        other.add_days(1) == *self
    }

    /// The `n` most recent days ending at `self`, oldest first.
    #[must_use]
    pub fn last_n(&self, n: usize) -> Vec<DateKey> {
        (0..n)
            .rev()
            .map(|offset| self.add_days(-(offset as i64)))
            .collect()
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl fmt::Debug for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DateKey({})", self.0.format("%Y-%m-%d"))
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DateKeyError::Invalid(s.to_owned()))
    }
}

//
// ─── CLOCK ─────────────────────────────────────────────────────────────────────
//

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Returns the current calendar day as a `DateKey`.
    ///
    /// The real clock uses the local timezone; a fixed clock uses the naive
    /// date of its timestamp so tests stay timezone-independent.
    #[must_use]
    pub fn today(&self) -> DateKey {
        match self {
            Clock::Default => DateKey::from_date(Local::now().date_naive()),
            Clock::Fixed(t) => DateKey::from_date(t.date_naive()),
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// Returns true if this clock represents real time.
    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self, Clock::Default)
    }

    /// Returns true if this clock is fixed.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
