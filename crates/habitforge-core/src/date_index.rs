//! Calendar dates to day numbers and back.
//!
//! A habit's days are numbered from its creation instant, not its start
//! date: the calendar day of `created_at` is day 1. Time of day never
//! matters; both sides are reduced to a calendar date in the tracker's
//! zone before subtracting.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, Utc};

/// Integer offset of a date from a habit's creation day (creation day = 1).
///
/// Zero and negative values are legal results for dates before creation.
pub type DayNumber = i64;

/// Where calendar days begin and end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DayZone {
    /// The system time zone, daylight saving included. Each instant gets
    /// the offset in force at that instant.
    #[default]
    Local,
    /// A constant offset from UTC.
    Fixed(FixedOffset),
}

impl DayZone {
    /// Constant offset of `minutes` east of UTC, `None` if out of range.
    pub fn east_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(DayZone::Fixed)
    }
}

/// Calendar date of `instant` as seen from `zone`.
pub fn calendar_day(instant: DateTime<Utc>, zone: DayZone) -> NaiveDate {
    match zone {
        DayZone::Local => instant.with_timezone(&Local).date_naive(),
        DayZone::Fixed(offset) => instant.with_timezone(&offset).date_naive(),
    }
}

/// Day number of `date` relative to the creation day of `created_at`.
pub fn day_number(date: NaiveDate, created_at: DateTime<Utc>, zone: DayZone) -> DayNumber {
    (date - calendar_day(created_at, zone)).num_days() + 1
}

/// Day number of "now", i.e. how many days the habit has existed.
pub fn days_since_creation(
    now: DateTime<Utc>,
    created_at: DateTime<Utc>,
    zone: DayZone,
) -> DayNumber {
    day_number(calendar_day(now, zone), created_at, zone)
}

/// Calendar date carrying day number `day`.
pub fn date_for_day(day: DayNumber, created_at: DateTime<Utc>, zone: DayZone) -> NaiveDate {
    calendar_day(created_at, zone) + Duration::days(day - 1)
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}
