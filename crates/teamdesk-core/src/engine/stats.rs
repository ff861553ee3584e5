//! Status aggregator - overdue / due-soon / completed counts

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Task, TaskStatus};
use crate::value_objects::UserId;

/// Width of the due-soon window
pub const DUE_SOON_WINDOW_DAYS: i64 = 7;

/// Whose view the counts are taken for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsScope {
    /// Admin view: every task, completed means the cached status says so
    Global,
    /// Member view: visible tasks, completed means this user completed it
    Personal(UserId),
}

impl StatsScope {
    #[inline]
    fn includes(&self, task: &Task) -> bool {
        match self {
            Self::Global => true,
            Self::Personal(user_id) => task.is_visible_to(user_id),
        }
    }

    #[inline]
    fn is_completed(&self, task: &Task) -> bool {
        match self {
            Self::Global => task.status == TaskStatus::Completed,
            Self::Personal(user_id) => task.is_completed_by(user_id),
        }
    }
}

/// Exactly one bucket per visible task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskBucket {
    Completed,
    Overdue,
    DueSoon,
    /// Pending and due on or after the end of the due-soon window
    Upcoming,
}

impl TaskBucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Overdue => "overdue",
            Self::DueSoon => "dueSoon",
            Self::Upcoming => "upcoming",
        }
    }
}

/// Classify one task for a scope
///
/// Overdue is strict (`due < now`); due-soon is `now <= due < now + 7d`.
pub fn classify(task: &Task, scope: &StatsScope, now: DateTime<Utc>) -> TaskBucket {
    if scope.is_completed(task) {
        return TaskBucket::Completed;
    }
    if task.due_date < now {
        return TaskBucket::Overdue;
    }
    if task.due_date < now + Duration::days(DUE_SOON_WINDOW_DAYS) {
        return TaskBucket::DueSoon;
    }
    TaskBucket::Upcoming
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub overdue: usize,
    pub due_soon: usize,
    pub completed: usize,
    pub total: usize,
}

impl TaskStats {
    /// Pending tasks that are neither overdue nor due soon
    pub fn upcoming(&self) -> usize {
        self.total
            .saturating_sub(self.completed)
            .saturating_sub(self.overdue)
            .saturating_sub(self.due_soon)
    }
}

pub fn task_stats(tasks: &[Task], scope: &StatsScope, now: DateTime<Utc>) -> TaskStats {
    tasks
        .iter()
        .filter(|task| scope.includes(task))
        .fold(TaskStats::default(), |mut stats, task| {
            stats.total += 1;
            match classify(task, scope, now) {
                TaskBucket::Completed => stats.completed += 1,
                TaskBucket::Overdue => stats.overdue += 1,
                TaskBucket::DueSoon => stats.due_soon += 1,
                TaskBucket::Upcoming => {}
            }
            stats
        })
}
