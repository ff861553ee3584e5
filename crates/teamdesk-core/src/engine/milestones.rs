//! Personal milestones shown on the member dashboard

use std::collections::HashSet;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::calendar::local_date;
use crate::entities::Task;
use crate::value_objects::UserId;

/// Completed tasks within the last week needed for the weekly milestone
pub const WEEKLY_MILESTONE_THRESHOLD: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Milestone {
    /// Every task due today is done
    DailyClear { date: NaiveDate, count: usize },
    /// Enough tasks completed over the last seven days
    WeeklyProgress { count: usize },
}

impl Milestone {
    pub fn message(&self) -> String {
        match self {
            Self::DailyClear { count, .. } => {
                format!("All {count} task(s) for today are done!")
            }
            Self::WeeklyProgress { count } => {
                format!("You completed {count} tasks this week. Keep it up!")
            }
        }
    }
}

/// Session-scoped gate for milestone notices
#[derive(Debug)]
pub struct MilestoneTracker {
    offset: FixedOffset,
    daily_fired: Option<NaiveDate>,
    weekly_fired: HashSet<usize>,
}

impl MilestoneTracker {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            daily_fired: None,
            weekly_fired: HashSet::new(),
        }
    }

    /// Evaluate a task snapshot for `user_id`
    pub fn observe(&mut self, tasks: &[Task], user_id: &UserId, now: DateTime<Utc>) -> Vec<Milestone> {
        let mut reached = Vec::new();
        let today = local_date(now, self.offset);

        let due_today: Vec<&Task> = tasks
            .iter()
            .filter(|task| task.is_visible_to(user_id))
            .filter(|task| local_date(task.due_date, self.offset) == today)
            .collect();
        if !due_today.is_empty()
            && due_today.iter().all(|task| task.is_completed_by(user_id))
            && self.daily_fired != Some(today)
        {
            self.daily_fired = Some(today);
            reached.push(Milestone::DailyClear {
                date: today,
                count: due_today.len(),
            });
        }

        let week_ago = now - Duration::days(7);
        let weekly = tasks
            .iter()
            .filter(|task| task.is_visible_to(user_id))
            .filter(|task| task.due_date > week_ago && task.is_completed_by(user_id))
            .count();
        if weekly >= WEEKLY_MILESTONE_THRESHOLD && self.weekly_fired.insert(weekly) {
            reached.push(Milestone::WeeklyProgress { count: weekly });
        }

        reached
    }
}
