//! Seven-day team trends

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::calendar::{local_date, trailing_days};
use crate::entities::{MinuteTracker, Task};

pub const TREND_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: u64,
}

/// Tasks due on each day that at least one user completed
pub fn completion_trend(tasks: &[Task], today: NaiveDate, offset: FixedOffset) -> Vec<TrendPoint> {
    trailing_days(today, TREND_DAYS)
        .into_iter()
        .map(|date| TrendPoint {
            date,
            value: tasks
                .iter()
                .filter(|task| !task.completed_by.is_empty())
                .filter(|task| local_date(task.due_date, offset) == date)
                .count() as u64,
        })
        .collect()
}

/// Declared tracker minutes per day
pub fn tracker_minutes_trend(
    trackers: &[MinuteTracker],
    today: NaiveDate,
    offset: FixedOffset,
) -> Vec<TrendPoint> {
    trailing_days(today, TREND_DAYS)
        .into_iter()
        .map(|date| TrendPoint {
            date,
            value: trackers
                .iter()
                .filter(|tracker| local_date(tracker.date, offset) == date)
                .map(|tracker| u64::from(tracker.total_minutes))
                .sum(),
        })
        .collect()
}
