//! Minute tracker - a dated time budget split into member tasks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::Priority;
use crate::value_objects::{DocumentId, UserId};

/// Minute tracker document
///
/// `total_minutes` is the declared budget. It is authored independently of
/// the children's `minutes` and never reconciled with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinuteTracker {
    #[serde(default = "DocumentId::unassigned")]
    pub id: DocumentId,
    pub date: DateTime<Utc>,
    pub total_minutes: u32,
    #[serde(default)]
    pub priority: Priority,
    pub description: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub members: Vec<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_template: Option<String>,
}

impl MinuteTracker {
    pub fn new(
        date: DateTime<Utc>,
        total_minutes: u32,
        priority: Priority,
        description: String,
        created_by: UserId,
    ) -> Self {
        Self {
            id: DocumentId::unassigned(),
            date,
            total_minutes,
            priority,
            description,
            created_by,
            created_at: Utc::now(),
            members: Vec::new(),
            task_template: None,
        }
    }

    #[inline]
    pub fn has_member(&self, user_id: &UserId) -> bool {
        self.members.contains(user_id)
    }
}

/// A member's slice of work inside a tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerTask {
    #[serde(default = "DocumentId::unassigned")]
    pub id: DocumentId,
    pub description: String,
    pub minutes: u32,
    #[serde(default)]
    pub completed: bool,
    pub member_id: UserId,
    pub tracker_id: DocumentId,
    pub created_at: DateTime<Utc>,
}

impl TrackerTask {
    pub fn new(tracker_id: DocumentId, member_id: UserId, description: String, minutes: u32) -> Self {
        Self {
            id: DocumentId::unassigned(),
            description,
            minutes,
            completed: false,
            member_id,
            tracker_id,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn belongs_to(&self, tracker_id: &DocumentId) -> bool {
        &self.tracker_id == tracker_id
    }
}
