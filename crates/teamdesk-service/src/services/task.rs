//! Task service
//!
//! Task CRUD, per-user completion and the task audit trail.

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use validator::Validate;

use teamdesk_core::engine::{calendar, classify, complete_task, task_stats, urgent_tasks};
use teamdesk_core::{Capabilities, DocumentId, Task, TaskAction, TaskHistoryEntry};

use crate::dto::{
    CreateTaskRequest, TaskCardResponse, TaskHistoryResponse, TaskOverviewResponse, TaskResponse,
    UpdateTaskRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceResult, StaleWrite};
use super::permission::{Actor, PermissionService};

/// Task service
pub struct TaskService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TaskService<'a> {
    /// Create a new TaskService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Append one audit entry for `task`
    async fn record_action(&self, task: &Task, actor: &Actor, action: TaskAction) -> ServiceResult<()> {
        let entry = TaskHistoryEntry::new(
            task.id.clone(),
            actor.id().clone(),
            actor.name().to_string(),
            action,
            task.title.clone(),
        );
        self.ctx.task_history_repo().create(entry).await?;
        Ok(())
    }

    /// Create a new task (admin, or staff with access level 2)
    #[instrument(skip(self, request))]
    pub async fn create_task(&self, request: CreateTaskRequest) -> ServiceResult<TaskResponse> {
        request.validate()?;

        let actor = PermissionService::new(self.ctx)
            .require_capability(Capabilities::MANAGE_TASKS)
            .await?;

        let task = Task::new(
            request.title.trim().to_string(),
            request.description.trim().to_string(),
            request.due_date,
            request.priority,
            request.assigned_to,
            actor.id().clone(),
        );
        let task = self.ctx.task_repo().create(task).await?;
        self.record_action(&task, &actor, TaskAction::Created).await?;

        info!(task_id = %task.id, created_by = %actor.id(), "Task created");
        Ok(TaskResponse::from(task))
    }

    /// Edit task fields; `Ok(None)` when the task no longer exists
    #[instrument(skip(self, request))]
    pub async fn update_task(
        &self,
        task_id: &DocumentId,
        request: UpdateTaskRequest,
    ) -> ServiceResult<Option<TaskResponse>> {
        request.validate()?;

        PermissionService::new(self.ctx)
            .require_capability(Capabilities::MANAGE_TASKS)
            .await?;

        let Some(mut task) = self.ctx.task_repo().find_by_id(task_id).await? else {
            warn!(task_id = %task_id, "Task vanished before update");
            return Ok(None);
        };

        if let Some(title) = request.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = request.description {
            task.description = description.trim().to_string();
        }
        if let Some(due_date) = request.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = request.priority {
            task.priority = priority;
        }
        if let Some(assigned_to) = request.assigned_to {
            task.assigned_to = assigned_to;
        }

        if !self.ctx.task_repo().update(&task).await.or_stale()? {
            warn!(task_id = %task_id, "Task vanished before update");
            return Ok(None);
        }

        info!(task_id = %task_id, "Task updated");
        Ok(Some(TaskResponse::from(task)))
    }

    /// Delete a task and log it; `Ok(None)` when it is already gone
    #[instrument(skip(self))]
    pub async fn delete_task(&self, task_id: &DocumentId) -> ServiceResult<Option<TaskResponse>> {
        let actor = PermissionService::new(self.ctx)
            .require_capability(Capabilities::MANAGE_TASKS)
            .await?;

        let Some(task) = self.ctx.task_repo().find_by_id(task_id).await? else {
            warn!(task_id = %task_id, "Task already deleted");
            return Ok(None);
        };

        self.ctx.task_repo().delete(task_id).await?;
        self.record_action(&task, &actor, TaskAction::Deleted).await?;

        info!(task_id = %task_id, deleted_by = %actor.id(), "Task deleted");
        Ok(Some(TaskResponse::from(task)))
    }

    /// Mark the task completed or not completed by the signed-in user
    ///
    /// Writes exactly one audit entry per call, even when the user's
    /// completion state did not change. `Ok(None)` when the task no longer
    /// exists; nothing is written then.
    #[instrument(skip(self))]
    pub async fn set_completion(
        &self,
        task_id: &DocumentId,
        completing: bool,
    ) -> ServiceResult<Option<TaskResponse>> {
        let actor = PermissionService::new(self.ctx)
            .require_capability(Capabilities::COMPLETE_TASKS)
            .await?;

        let Some(mut task) = self.ctx.task_repo().find_by_id(task_id).await? else {
            warn!(task_id = %task_id, "Completion target no longer exists");
            return Ok(None);
        };

        let outcome = complete_task(&task, actor.id(), completing);
        task.completed_by = outcome.completed_by;
        task.status = outcome.status;

        if !self.ctx.task_repo().update(&task).await.or_stale()? {
            warn!(task_id = %task_id, "Completion target no longer exists");
            return Ok(None);
        }
        self.record_action(&task, &actor, outcome.action).await?;

        info!(
            task_id = %task_id,
            user_id = %actor.id(),
            action = %outcome.action,
            completions = task.completion_count(),
            "Task completion updated"
        );
        Ok(Some(TaskResponse::from(task)))
    }

    /// Flip the signed-in user's completion of a task
    #[instrument(skip(self))]
    pub async fn toggle_completion(&self, task_id: &DocumentId) -> ServiceResult<Option<TaskResponse>> {
        let actor = PermissionService::new(self.ctx).actor().await?;
        let Some(task) = self.ctx.task_repo().find_by_id(task_id).await? else {
            warn!(task_id = %task_id, "Completion target no longer exists");
            return Ok(None);
        };
        self.set_completion(task_id, !task.is_completed_by(actor.id()))
            .await
    }

    /// Tasks the signed-in user sees, classified for that user
    ///
    /// Admins see every task; everyone else sees tasks assigned to them or
    /// to everyone.
    #[instrument(skip(self))]
    pub async fn visible_tasks(&self, now: DateTime<Utc>) -> ServiceResult<Vec<TaskCardResponse>> {
        let actor = PermissionService::new(self.ctx).actor().await?;
        let scope = actor.stats_scope();
        let tasks = self.ctx.task_repo().snapshot().await?;

        Ok(tasks
            .iter()
            .filter(|task| actor.is_admin() || task.is_visible_to(actor.id()))
            .map(|task| TaskCardResponse {
                task: TaskResponse::from(task),
                bucket: classify(task, &scope, now),
                completed_by_me: task.is_completed_by(actor.id()),
            })
            .collect())
    }

    /// Visible tasks due on today's local date
    #[instrument(skip(self))]
    pub async fn today_tasks(&self, now: DateTime<Utc>) -> ServiceResult<Vec<Task>> {
        let actor = PermissionService::new(self.ctx).actor().await?;
        let offset = self.ctx.attendance_policy().offset;
        let today = calendar::local_date(now, offset);

        let tasks = self.ctx.task_repo().snapshot().await?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.is_visible_to(actor.id()))
            .filter(|task| calendar::local_date(task.due_date, offset) == today)
            .collect())
    }

    /// Counts and urgent list for the signed-in user
    #[instrument(skip(self))]
    pub async fn overview(&self, now: DateTime<Utc>) -> ServiceResult<TaskOverviewResponse> {
        let actor = PermissionService::new(self.ctx).actor().await?;
        let tasks = self.ctx.task_repo().snapshot().await?;

        Ok(TaskOverviewResponse {
            stats: task_stats(&tasks, &actor.stats_scope(), now),
            urgent: urgent_tasks(&tasks, actor.id())
                .into_iter()
                .map(TaskResponse::from)
                .collect(),
        })
    }

    /// Full audit trail, newest first
    pub async fn history(&self) -> ServiceResult<Vec<TaskHistoryResponse>> {
        let entries = self.ctx.task_history_repo().snapshot().await?;
        Ok(entries.iter().map(TaskHistoryResponse::from).collect())
    }

    /// Remove one audit entry
    #[instrument(skip(self))]
    pub async fn delete_history_entry(
        &self,
        entry_id: &DocumentId,
    ) -> ServiceResult<Option<TaskHistoryResponse>> {
        let actor = PermissionService::new(self.ctx)
            .require_capability(Capabilities::DELETE_HISTORY)
            .await?;

        let Some(entry) = self.ctx.task_history_repo().find_by_id(entry_id).await? else {
            warn!(entry_id = %entry_id, "History entry already deleted");
            return Ok(None);
        };
        self.ctx.task_history_repo().delete(entry_id).await?;

        info!(entry_id = %entry_id, deleted_by = %actor.id(), "History entry deleted");
        Ok(Some(TaskHistoryResponse::from(&entry)))
    }

    /// Remove the whole audit trail, returning how many entries went
    #[instrument(skip(self))]
    pub async fn clear_history(&self) -> ServiceResult<usize> {
        let actor = PermissionService::new(self.ctx)
            .require_capability(Capabilities::DELETE_HISTORY)
            .await?;

        let entries = self.ctx.task_history_repo().snapshot().await?;
        for entry in &entries {
            self.ctx.task_history_repo().delete(&entry.id).await?;
        }

        info!(count = entries.len(), deleted_by = %actor.id(), "Task history cleared");
        Ok(entries.len())
    }
}
