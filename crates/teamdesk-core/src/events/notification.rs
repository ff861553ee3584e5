//! Notifications - user-facing signals derived from snapshots
//!
//! Emitted by a dashboard session when a derivation crosses a threshold:
//! - urgent task notices
//! - tracker celebrations
//! - personal milestones
//! - refreshed task statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{Milestone, TaskStats, UrgencyNotice};
use crate::value_objects::{DocumentId, UserId};

/// All notifications a session can emit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Notification {
    UrgentTasks(UrgentTasksEvent),
    TrackerCompleted(TrackerCompletedEvent),
    MilestoneReached(MilestoneReachedEvent),
    StatsUpdated(StatsUpdatedEvent),
}

impl Notification {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::UrgentTasks(_) => "URGENT_TASKS",
            Self::TrackerCompleted(_) => "TRACKER_COMPLETED",
            Self::MilestoneReached(_) => "MILESTONE_REACHED",
            Self::StatsUpdated(_) => "STATS_UPDATED",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::UrgentTasks(e) => e.timestamp,
            Self::TrackerCompleted(e) => e.timestamp,
            Self::MilestoneReached(e) => e.timestamp,
            Self::StatsUpdated(e) => e.timestamp,
        }
    }

    /// Text shown to the user, if the notification is meant to be read
    pub fn message(&self) -> Option<String> {
        match self {
            Self::UrgentTasks(e) => Some(format!(
                "You have {} urgent task(s)! First: \"{}\"",
                e.count, e.first_title
            )),
            Self::TrackerCompleted(_) => Some("All tracker tasks completed!".to_string()),
            Self::MilestoneReached(e) => Some(e.milestone.message()),
            Self::StatsUpdated(_) => None,
        }
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgentTasksEvent {
    pub user_id: UserId,
    pub count: usize,
    pub task_id: DocumentId,
    pub first_title: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerCompletedEvent {
    pub tracker_id: DocumentId,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneReachedEvent {
    pub user_id: UserId,
    pub milestone: Milestone,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsUpdatedEvent {
    pub stats: TaskStats,
    pub timestamp: DateTime<Utc>,
}

impl UrgentTasksEvent {
    pub fn new(user_id: UserId, notice: UrgencyNotice) -> Self {
        Self {
            user_id,
            count: notice.count,
            task_id: notice.task_id,
            first_title: notice.first_title,
            timestamp: Utc::now(),
        }
    }
}

impl TrackerCompletedEvent {
    pub fn new(tracker_id: DocumentId) -> Self {
        Self {
            tracker_id,
            timestamp: Utc::now(),
        }
    }
}

impl MilestoneReachedEvent {
    pub fn new(user_id: UserId, milestone: Milestone) -> Self {
        Self {
            user_id,
            milestone,
            timestamp: Utc::now(),
        }
    }
}

impl StatsUpdatedEvent {
    pub fn new(stats: TaskStats) -> Self {
        Self {
            stats,
            timestamp: Utc::now(),
        }
    }
}
