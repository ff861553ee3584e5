//! Audit records - task history, tracker history and login history

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::task::TaskAction;
use crate::value_objects::{DocumentId, UserId};

/// Append-only audit entry for one task lifecycle event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskHistoryEntry {
    #[serde(default = "DocumentId::unassigned")]
    pub id: DocumentId,
    pub task_id: DocumentId,
    pub user_id: UserId,
    pub user_name: String,
    pub action: TaskAction,
    pub timestamp: DateTime<Utc>,
    pub task_title: String,
}

impl TaskHistoryEntry {
    pub fn new(
        task_id: DocumentId,
        user_id: UserId,
        user_name: String,
        action: TaskAction,
        task_title: String,
    ) -> Self {
        Self {
            id: DocumentId::unassigned(),
            task_id,
            user_id,
            user_name,
            action,
            timestamp: Utc::now(),
            task_title,
        }
    }
}

/// Audit action recorded in tracker history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerAction {
    Created,
    Updated,
}

/// Append-only audit entry for a tracker, removed with its tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerHistoryEntry {
    #[serde(default = "DocumentId::unassigned")]
    pub id: DocumentId,
    pub tracker_id: DocumentId,
    pub user_id: UserId,
    pub user_name: String,
    pub action: TrackerAction,
    /// Declared budget at the time of the action
    pub minutes: u32,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl TrackerHistoryEntry {
    pub fn new(
        tracker_id: DocumentId,
        user_id: UserId,
        user_name: String,
        action: TrackerAction,
        minutes: u32,
        description: String,
    ) -> Self {
        Self {
            id: DocumentId::unassigned(),
            tracker_id,
            user_id,
            user_name,
            action,
            minutes,
            description,
            timestamp: Utc::now(),
        }
    }
}

/// One authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginHistoryEntry {
    #[serde(default = "DocumentId::unassigned")]
    pub id: DocumentId,
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub login_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logout_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_info: Option<String>,
}

impl LoginHistoryEntry {
    pub fn new(user_id: UserId, user_name: String, email: String, login_time: DateTime<Utc>) -> Self {
        Self {
            id: DocumentId::unassigned(),
            user_id,
            user_name,
            email,
            login_time,
            logout_time: None,
            ip_address: None,
            device_info: None,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.logout_time.is_none()
    }

    /// Session length, known only once the session has ended
    pub fn duration(&self) -> Option<Duration> {
        self.logout_time.map(|logout| logout - self.login_time)
    }

    /// Session length rounded to whole minutes
    pub fn duration_minutes(&self) -> Option<i64> {
        self.duration()
            .map(|d| (d.num_seconds() as f64 / 60.0).round() as i64)
    }

    /// Close the session
    pub fn end(&mut self, at: DateTime<Utc>) {
        self.logout_time = Some(at);
    }
}
