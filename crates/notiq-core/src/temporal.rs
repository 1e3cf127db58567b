//! Publication-date ranges and calendar helpers.
//!
//! All boundaries are computed against an explicit `now` so that callers can
//! pin time in tests; the `*_now` conveniences read the system clock.

use chrono::{DateTime, Datelike, Months, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// NAMED PUBLISHED RANGES
// =============================================================================

/// Named publication-date shortcuts offered by the search builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishedRange {
    /// January 1st of the current year through now.
    CurrentYear,
    /// One year ago through now.
    PastOneYear,
    /// Five years ago through now.
    PastFiveYears,
}

impl PublishedRange {
    /// Concrete inclusive `(from, to)` boundaries relative to `now`.
    pub fn to_boundaries(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let from = match self {
            Self::CurrentYear => start_of_year(now),
            Self::PastOneYear => years_before(now, 1),
            Self::PastFiveYears => years_before(now, 5),
        };
        (from, now)
    }

    /// Boundaries relative to the system clock.
    pub fn to_boundaries_now(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        self.to_boundaries(Utc::now())
    }
}

// =============================================================================
// CALENDAR HELPERS
// =============================================================================

/// `now` shifted back by whole calendar years.
///
/// February 29th maps to February 28th in non-leap target years.
pub fn years_before(now: DateTime<Utc>, years: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(years * 12))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Midnight UTC at the start of `now`'s day.
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN))
}

/// Midnight UTC on January 1st of `now`'s year.
pub fn start_of_year(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(|| start_of_day(now))
}

// =============================================================================
// TESTS
// =============================================================================
