//! Day numbering in the local zone across a daylight-saving change.
//!
//! Runs in its own test binary because it sets `TZ` for the process.

use chrono::{NaiveDate, TimeZone, Utc};

use habitforge_core::date_index::{calendar_day, days_since_creation};
use habitforge_core::{Config, DayZone, HabitInput, HabitStore, MemoryStore};

fn central_european_time() {
    std::env::set_var("TZ", "CET-1CEST,M3.5.0,M10.5.0/3");
}

#[test]
fn summer_evening_counts_as_the_next_day() {
    central_european_time();

    // 23:30 CET, created in winter
    let created = Utc.with_ymd_and_hms(2026, 1, 10, 22, 30, 0).unwrap();
    assert_eq!(
        calendar_day(created, DayZone::Local),
        NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()
    );

    // 00:30 CEST on July 2nd, still July 1st at the winter offset
    let summer = Utc.with_ymd_and_hms(2026, 7, 1, 22, 30, 0).unwrap();
    assert_eq!(
        calendar_day(summer, DayZone::Local),
        NaiveDate::from_ymd_opt(2026, 7, 2).unwrap()
    );
    assert_eq!(days_since_creation(summer, created, DayZone::Local), 174);

    let winter_offset = DayZone::east_minutes(60).unwrap();
    assert_eq!(days_since_creation(summer, created, winter_offset), 173);
}

#[test]
fn store_without_configured_offset_uses_local_rules() {
    central_european_time();

    let created = Utc.with_ymd_and_hms(2026, 3, 28, 12, 0, 0).unwrap();
    let mut store = HabitStore::open(MemoryStore::new(), &Config::default());
    let id = store.add_habit(HabitInput::new("Run"), created).unwrap().id;
    assert_eq!(store.zone(), DayZone::Local);

    // Clocks go forward on March 29th; 22:30 UTC is already the 31st
    let after_change = Utc.with_ymd_and_hms(2026, 3, 30, 22, 30, 0).unwrap();
    let habit = store.habit(id).unwrap();
    assert_eq!(habit.days_since_creation(after_change, store.zone()), 4);
}
