//! Local calendar helpers shared by attendance, milestones and insights

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Timelike, Utc};

/// UTC as a fixed offset
pub fn utc_offset() -> FixedOffset {
    Utc.fix()
}

/// Build an offset from whole minutes east of UTC
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(minutes.checked_mul(60)?)
}

/// Calendar day of `instant` in the given offset
#[inline]
pub fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// Hour of day of `instant` in the given offset
#[inline]
pub fn local_hour(instant: DateTime<Utc>, offset: FixedOffset) -> u32 {
    instant.with_timezone(&offset).hour()
}

/// The `days` calendar days ending with `today`, oldest first
pub fn trailing_days(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..i64::from(days))
        .rev()
        .map(|back| today - Duration::days(back))
        .collect()
}
