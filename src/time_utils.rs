// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time policy: scoring weeks, staleness
//! boundaries and cache lifetimes.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::time::Duration;

/// Zone in which a new scoring week begins.
pub const SCORING_WEEK_ZONE: Tz = chrono_tz::America::New_York;

/// Zone whose morning bounds player stat staleness.
pub const STALENESS_ZONE: Tz = chrono_tz::America::Los_Angeles;

/// Resolve a wall-clock time in `tz`. Gaps fall back to the UTC reading.
fn local_instant(tz: Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

/// Most recent Monday 09:00 (New York) that is not after `now`.
pub fn start_of_scoring_week(now: DateTime<Utc>) -> DateTime<Utc> {
    let local = now.with_timezone(&SCORING_WEEK_ZONE);
    let back = u64::from(local.weekday().num_days_from_monday());
    let monday = local.date_naive() - Days::new(back);

    let candidate = local_instant(SCORING_WEEK_ZONE, monday.and_hms_opt(9, 0, 0).unwrap_or_default());
    if candidate <= now {
        return candidate;
    }

    let previous = monday - Days::new(7);
    local_instant(SCORING_WEEK_ZONE, previous.and_hms_opt(9, 0, 0).unwrap_or_default())
}

/// 08:00 Los Angeles time on the day after the game's local date.
///
/// Stats for a game are settled by then, so this is when stored player
/// stats become stale.
pub fn morning_after(game_start: DateTime<Utc>) -> DateTime<Utc> {
    let game_day = game_start.with_timezone(&STALENESS_ZONE).date_naive();
    let next_day = game_day + Days::new(1);
    local_instant(STALENESS_ZONE, next_day.and_hms_opt(8, 0, 0).unwrap_or_default())
}

/// Time left until 23:59:59 on the local day of `now`. Never zero.
pub fn ttl_until_end_of_day(now: DateTime<Tz>) -> Duration {
    let end = now
        .date_naive()
        .and_hms_opt(23, 59, 59)
        .unwrap_or_default();
    let end = local_instant(now.timezone(), end);

    let remaining = (end - now.with_timezone(&Utc)).num_seconds();
    Duration::from_secs(remaining.max(1) as u64)
}

/// Current season in `YYYYYYYY` form. A new season starts in July.
pub fn current_nhl_season(now: DateTime<Utc>) -> String {
    let year = now.year();
    if now.month() >= 7 {
        format!("{}{}", year, year + 1)
    } else {
        format!("{}{}", year - 1, year)
    }
}

/// Zero date used when an upstream date fails to parse.
pub fn zero_date() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or_default()
}
