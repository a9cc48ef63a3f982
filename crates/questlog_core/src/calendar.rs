//! Local calendar windows used to query the completion ledger.
//!
//! # Responsibility
//! - Compute local midnight for "completed today" lookups.
//! - Compute the local start of the ISO week for the weekly leaderboard.
//!
//! # Invariants
//! - Windows are derived from the caller's `now`; nothing is cached, so a
//!   midnight rollover is picked up on the next read.
//! - Returned boundaries are Unix epoch milliseconds.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};

/// Returns local midnight of the day containing `now`.
pub fn day_start_ms<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    local_midnight_ms(&now.timezone(), now.date_naive(), now)
}

/// Returns local midnight of the Monday starting the ISO week of `now`.
pub fn week_start_ms<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    let today = now.date_naive();
    let days_since_monday = i64::from(today.weekday().num_days_from_monday());
    let monday = today - Duration::days(days_since_monday);
    local_midnight_ms(&now.timezone(), monday, now)
}

fn local_midnight_ms<Tz: TimeZone>(tz: &Tz, date: NaiveDate, now: &DateTime<Tz>) -> i64 {
    let Some(midnight) = date.and_hms_opt(0, 0, 0) else {
        return now.timestamp_millis();
    };

    // Midnight can be skipped by a DST jump; use the first instant after it.
    match tz.from_local_datetime(&midnight).earliest() {
        Some(start) => start.timestamp_millis(),
        None => tz
            .from_local_datetime(&(midnight + Duration::hours(1)))
            .earliest()
            .map_or_else(|| now.timestamp_millis(), |start| start.timestamp_millis()),
    }
}
