//! Urgency selector

use std::fmt;

use crate::entities::Task;
use crate::value_objects::{DocumentId, UserId};

/// Maximum number of tasks surfaced as urgent
pub const URGENT_TASK_LIMIT: usize = 3;

/// Pending tasks visible to `user_id`, earliest due first, at most three
///
/// The sort is stable so tasks with equal due dates keep snapshot order.
pub fn urgent_tasks<'a>(tasks: &'a [Task], user_id: &UserId) -> Vec<&'a Task> {
    let mut urgent: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.is_pending() && task.is_visible_to(user_id))
        .collect();
    urgent.sort_by_key(|task| task.due_date);
    urgent.truncate(URGENT_TASK_LIMIT);
    urgent
}

/// The single notice surfaced for a non-empty urgent list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrgencyNotice {
    pub count: usize,
    pub task_id: DocumentId,
    pub first_title: String,
}

impl fmt::Display for UrgencyNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "You have {} urgent task(s)! First: \"{}\"",
            self.count, self.first_title
        )
    }
}

/// Session-scoped gate deciding when an urgent list is worth a notice
///
/// Fires when the leading urgent task changes. An empty list re-arms it.
#[derive(Debug, Default)]
pub struct UrgencyNotifier {
    leading: Option<DocumentId>,
}

impl UrgencyNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the latest urgent list
    pub fn observe(&mut self, urgent: &[&Task]) -> Option<UrgencyNotice> {
        let Some(first) = urgent.first() else {
            self.leading = None;
            return None;
        };

        if self.leading.as_ref() == Some(&first.id) {
            return None;
        }
        self.leading = Some(first.id.clone());

        Some(UrgencyNotice {
            count: urgent.len(),
            task_id: first.id.clone(),
            first_title: first.title.clone(),
        })
    }
}
