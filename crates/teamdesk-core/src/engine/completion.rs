//! Completion mutator

use crate::entities::{Task, TaskAction, TaskStatus};
use crate::value_objects::UserId;

/// Result of toggling one user's completion on a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub completed_by: Vec<UserId>,
    pub status: TaskStatus,
    /// Audit action to append, one per invocation
    pub action: TaskAction,
}

/// Compute the new completion state without touching the input
pub fn complete_task(task: &Task, user_id: &UserId, completing: bool) -> CompletionOutcome {
    let mut next = task.clone();
    let action = next.apply_completion(user_id, completing);
    CompletionOutcome {
        completed_by: next.completed_by,
        status: next.status,
        action,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Priority;
    use chrono::Utc;

    fn task_with(completed_by: &[&str]) -> Task {
        let mut task = Task::new(
            "Inventory".to_string(),
            String::new(),
            Utc::now(),
            Priority::Medium,
            Vec::new(),
            UserId::from("admin"),
        );
        task.completed_by = completed_by.iter().map(|u| UserId::from(*u)).collect();
        task.refresh_status();
        task
    }

    #[test]
    fn test_double_complete_is_idempotent_but_audited_twice() {
        let mut task = task_with(&[]);
        let user = UserId::from("u");
        let mut actions = Vec::new();

        for _ in 0..2 {
            let outcome = complete_task(&task, &user, true);
            task.completed_by = outcome.completed_by;
            task.status = outcome.status;
            actions.push(outcome.action);
        }

        assert_eq!(task.completed_by, vec![user]);
        assert_eq!(actions, vec![TaskAction::Completed, TaskAction::Completed]);
    }

    #[test]
    fn test_round_trip_restores_membership_order() {
        let task = task_with(&["a", "b", "c"]);
        let user = UserId::from("d");

        let done = complete_task(&task, &user, true);
        let mut after = task.clone();
        after.completed_by = done.completed_by;

        let undone = complete_task(&after, &user, false);
        assert_eq!(undone.completed_by, task.completed_by);
        assert_eq!(undone.status, TaskStatus::Completed);
        assert_eq!(undone.action, TaskAction::Uncompleted);
    }

    #[test]
    fn test_uncomplete_absent_user_is_noop() {
        let task = task_with(&[]);
        let outcome = complete_task(&task, &UserId::from("x"), false);
        assert!(outcome.completed_by.is_empty());
        assert_eq!(outcome.status, TaskStatus::Pending);
        assert_eq!(outcome.action, TaskAction::Uncompleted);
    }

    #[test]
    fn test_removing_middle_preserves_rest() {
        let task = task_with(&["a", "b", "c"]);
        let outcome = complete_task(&task, &UserId::from("b"), false);
        assert_eq!(
            outcome.completed_by,
            vec![UserId::from("a"), UserId::from("c")]
        );
    }
}
