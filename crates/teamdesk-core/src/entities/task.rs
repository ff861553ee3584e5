//! Task entity - a unit of team work with per-member completion

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{DocumentId, UserId};

/// Cached completion state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl TaskStatus {
    /// Status implied by a `completedBy` list
    #[inline]
    pub fn from_completions(completed_by: &[UserId]) -> Self {
        if completed_by.is_empty() {
            Self::Pending
        } else {
            Self::Completed
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority shared by tasks and minute trackers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit action recorded in task history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskAction {
    Created,
    Completed,
    Uncompleted,
    Deleted,
}

impl TaskAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Completed => "completed",
            Self::Uncompleted => "uncompleted",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task document
///
/// `status` is a materialized cache of `!completed_by.is_empty()`; every
/// mutation of `completed_by` goes through [`Task::apply_completion`] or
/// [`Task::refresh_status`] so the two never disagree after a local write.
/// Snapshots read from the store are taken as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default = "DocumentId::unassigned")]
    pub id: DocumentId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: DateTime<Utc>,
    /// Empty means the task is assigned to everyone
    #[serde(default)]
    pub assigned_to: Vec<UserId>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub created_by: UserId,
    /// Completion order, no duplicates
    #[serde(default)]
    pub completed_by: Vec<UserId>,
}

impl Task {
    /// Create a new pending task
    pub fn new(
        title: String,
        description: String,
        due_date: DateTime<Utc>,
        priority: Priority,
        assigned_to: Vec<UserId>,
        created_by: UserId,
    ) -> Self {
        Self {
            id: DocumentId::unassigned(),
            title,
            description,
            due_date,
            assigned_to,
            status: TaskStatus::Pending,
            priority,
            created_at: Utc::now(),
            created_by,
            completed_by: Vec::new(),
        }
    }

    /// Unassigned tasks are visible to everyone
    #[inline]
    pub fn is_visible_to(&self, user_id: &UserId) -> bool {
        self.assigned_to.is_empty() || self.assigned_to.contains(user_id)
    }

    #[inline]
    pub fn is_assigned_to_everyone(&self) -> bool {
        self.assigned_to.is_empty()
    }

    /// Whether the cached store-level status says pending
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    #[inline]
    pub fn is_completed_by(&self, user_id: &UserId) -> bool {
        self.completed_by.contains(user_id)
    }

    /// Add or remove `user_id` from `completed_by` and rewrite `status`
    ///
    /// Returns the audit action for this call. The action is reported even
    /// when membership did not change.
    pub fn apply_completion(&mut self, user_id: &UserId, completing: bool) -> TaskAction {
        if completing {
            if !self.is_completed_by(user_id) {
                self.completed_by.push(user_id.clone());
            }
        } else {
            self.completed_by.retain(|id| id != user_id);
        }
        self.refresh_status();

        if completing {
            TaskAction::Completed
        } else {
            TaskAction::Uncompleted
        }
    }

    /// Recompute the cached status from `completed_by`
    pub fn refresh_status(&mut self) {
        self.status = TaskStatus::from_completions(&self.completed_by);
    }

    pub fn completion_count(&self) -> usize {
        self.completed_by.len()
    }
}
