//! Attendance record - one clock-in/clock-out pair per user per day

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{DocumentId, UserId};

/// Derived attendance classification
///
/// `Absent` is part of the stored vocabulary but never produced by clocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Late => "late",
            Self::Absent => "absent",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default = "DocumentId::unassigned")]
    pub id: DocumentId,
    pub user_id: UserId,
    pub user_name: String,
    /// Local calendar day, `yyyy-MM-dd` on the wire
    pub date: NaiveDate,
    pub time_in: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_out: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    /// Open a record at clock-in
    pub fn clock_in(
        user_id: UserId,
        user_name: String,
        date: NaiveDate,
        time_in: DateTime<Utc>,
        status: AttendanceStatus,
    ) -> Self {
        Self {
            id: DocumentId::unassigned(),
            user_id,
            user_name,
            date,
            time_in,
            time_out: None,
            status,
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.time_out.is_none()
    }

    /// Close the record; the clock-out classification replaces the clock-in one
    pub fn clock_out(&mut self, time_out: DateTime<Utc>, status: AttendanceStatus) {
        self.time_out = Some(time_out);
        self.status = status;
    }
}
