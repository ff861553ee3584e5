//! Attendance status deriver and clock state

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use super::calendar::{local_date, local_hour, utc_offset};
use crate::entities::{AttendanceRecord, AttendanceStatus};
use crate::value_objects::UserId;

/// First local hour counted as late
pub const DEFAULT_LATE_HOUR: u32 = 9;

/// Lateness cutoff and the offset used to read hours and dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendancePolicy {
    pub late_hour: u32,
    pub offset: FixedOffset,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            late_hour: DEFAULT_LATE_HOUR,
            offset: utc_offset(),
        }
    }
}

impl AttendancePolicy {
    pub fn new(late_hour: u32, offset: FixedOffset) -> Self {
        Self { late_hour, offset }
    }

    /// `late` from the cutoff hour on, `present` before it
    pub fn derive_status(&self, instant: DateTime<Utc>) -> AttendanceStatus {
        if local_hour(instant, self.offset) >= self.late_hour {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        }
    }

    /// Attendance day an instant belongs to
    #[inline]
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        local_date(instant, self.offset)
    }
}

/// Per-user, per-day clock state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceState<'a> {
    NoRecord,
    ClockedIn(&'a AttendanceRecord),
    ClockedOut(&'a AttendanceRecord),
}

impl<'a> AttendanceState<'a> {
    /// State derived from the first of the user's records dated `today`
    ///
    /// Later records for the same day are ignored, so anything after a
    /// clock-out reads as not clocked in.
    pub fn of(records: &'a [AttendanceRecord], user_id: &UserId, today: NaiveDate) -> Self {
        match records
            .iter()
            .find(|record| &record.user_id == user_id && record.date == today)
        {
            None => Self::NoRecord,
            Some(record) if record.is_open() => Self::ClockedIn(record),
            Some(record) => Self::ClockedOut(record),
        }
    }

    #[inline]
    pub fn is_clocked_in(&self) -> bool {
        matches!(self, Self::ClockedIn(_))
    }

    pub fn record(&self) -> Option<&'a AttendanceRecord> {
        match self {
            Self::NoRecord => None,
            Self::ClockedIn(record) | Self::ClockedOut(record) => Some(record),
        }
    }
}
