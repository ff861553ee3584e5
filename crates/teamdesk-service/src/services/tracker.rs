//! Minute tracker service
//!
//! Trackers, their member tasks, and the roll-up shown on the tracker board.

use tracing::{debug, info, instrument, warn};
use validator::Validate;

use teamdesk_core::engine::{all_completed, member_minutes, tracker_summary, TrackerSummary};
use teamdesk_core::{
    Capabilities, DocumentId, MinuteTracker, TrackerAction, TrackerHistoryEntry, TrackerTask,
    UserId,
};

use crate::dto::{
    CreateTrackerRequest, CreateTrackerTaskRequest, MemberMinutesResponse, TrackerDetailResponse,
    TrackerHistoryResponse, TrackerResponse, TrackerTaskResponse, TrackerToggleResponse,
    UpdateTrackerRequest, UpdateTrackerTaskRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult, StaleWrite};
use super::permission::{Actor, PermissionService};

/// Minute tracker service
pub struct TrackerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TrackerService<'a> {
    /// Create a new TrackerService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn tasks_of(&self, tracker_id: &DocumentId) -> ServiceResult<Vec<TrackerTask>> {
        let tasks = self.ctx.tracker_task_repo().snapshot().await?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.belongs_to(tracker_id))
            .collect())
    }

    async fn record_history(
        &self,
        actor: &Actor,
        tracker: &MinuteTracker,
        action: TrackerAction,
    ) -> ServiceResult<()> {
        let entry = TrackerHistoryEntry::new(
            tracker.id.clone(),
            actor.id().clone(),
            actor.name().to_string(),
            action,
            tracker.total_minutes,
            tracker.description.clone(),
        );
        self.ctx.tracker_history_repo().create(entry).await?;
        Ok(())
    }

    // ========================================================================
    // Trackers
    // ========================================================================

    /// Create a tracker (admin or staff)
    #[instrument(skip(self, request))]
    pub async fn create_tracker(&self, request: CreateTrackerRequest) -> ServiceResult<TrackerResponse> {
        request.validate()?;

        let actor = PermissionService::new(self.ctx)
            .require_capability(Capabilities::MANAGE_TRACKERS)
            .await?;

        let mut tracker = MinuteTracker::new(
            request.date,
            request.total_minutes,
            request.priority,
            request.description.trim().to_string(),
            actor.id().clone(),
        );
        tracker.members = request.members;
        tracker.task_template = request
            .task_template
            .filter(|template| !template.trim().is_empty());

        let tracker = self.ctx.tracker_repo().create(tracker).await?;
        self.record_history(&actor, &tracker, TrackerAction::Created).await?;
        info!(
            tracker_id = %tracker.id,
            members = tracker.members.len(),
            total_minutes = tracker.total_minutes,
            "Tracker created"
        );
        Ok(TrackerResponse::from(tracker))
    }

    /// Edit a tracker; `Ok(None)` when it no longer exists
    #[instrument(skip(self, request))]
    pub async fn update_tracker(
        &self,
        tracker_id: &DocumentId,
        request: UpdateTrackerRequest,
    ) -> ServiceResult<Option<TrackerResponse>> {
        request.validate()?;

        let actor = PermissionService::new(self.ctx)
            .require_capability(Capabilities::MANAGE_TRACKERS)
            .await?;

        let Some(mut tracker) = self.ctx.tracker_repo().find_by_id(tracker_id).await? else {
            warn!(tracker_id = %tracker_id, "Tracker vanished before update");
            return Ok(None);
        };

        if let Some(date) = request.date {
            tracker.date = date;
        }
        if let Some(total_minutes) = request.total_minutes {
            tracker.total_minutes = total_minutes;
        }
        if let Some(priority) = request.priority {
            tracker.priority = priority;
        }
        if let Some(description) = request.description {
            tracker.description = description.trim().to_string();
        }
        if let Some(members) = request.members {
            tracker.members = members;
        }
        if let Some(template) = request.task_template {
            tracker.task_template = (!template.trim().is_empty()).then_some(template);
        }

        if !self.ctx.tracker_repo().update(&tracker).await.or_stale()? {
            warn!(tracker_id = %tracker_id, "Tracker vanished before update");
            return Ok(None);
        }
        self.record_history(&actor, &tracker, TrackerAction::Updated).await?;

        info!(tracker_id = %tracker_id, "Tracker updated");
        Ok(Some(TrackerResponse::from(tracker)))
    }

    /// Delete a tracker together with its tasks and history
    #[instrument(skip(self))]
    pub async fn delete_tracker(&self, tracker_id: &DocumentId) -> ServiceResult<Option<TrackerResponse>> {
        PermissionService::new(self.ctx)
            .require_capability(Capabilities::MANAGE_TRACKERS)
            .await?;

        let Some(tracker) = self.ctx.tracker_repo().find_by_id(tracker_id).await? else {
            warn!(tracker_id = %tracker_id, "Tracker already deleted");
            return Ok(None);
        };

        let tasks = self.tasks_of(tracker_id).await?;
        for task in &tasks {
            self.ctx.tracker_task_repo().delete(&task.id).await?;
        }
        let history = self.history_of(tracker_id).await?;
        for entry in &history {
            self.ctx.tracker_history_repo().delete(&entry.id).await?;
        }
        self.ctx.tracker_repo().delete(tracker_id).await?;

        info!(
            tracker_id = %tracker_id,
            tasks = tasks.len(),
            history = history.len(),
            "Tracker deleted"
        );
        Ok(Some(TrackerResponse::from(tracker)))
    }

    async fn history_of(
        &self,
        tracker_id: &DocumentId,
    ) -> ServiceResult<Vec<TrackerHistoryEntry>> {
        let entries = self.ctx.tracker_history_repo().snapshot().await?;
        Ok(entries
            .into_iter()
            .filter(|entry| &entry.tracker_id == tracker_id)
            .collect())
    }

    /// Audit trail of one tracker, newest first
    #[instrument(skip(self))]
    pub async fn history(
        &self,
        tracker_id: &DocumentId,
    ) -> ServiceResult<Vec<TrackerHistoryResponse>> {
        PermissionService::new(self.ctx)
            .require_capability(Capabilities::MANAGE_TRACKERS)
            .await?;

        let entries = self.history_of(tracker_id).await?;
        Ok(entries.iter().map(TrackerHistoryResponse::from).collect())
    }

    /// Every tracker, newest date first
    pub async fn trackers(&self) -> ServiceResult<Vec<TrackerResponse>> {
        let trackers = self.ctx.tracker_repo().snapshot().await?;
        Ok(trackers.iter().map(TrackerResponse::from).collect())
    }

    /// One tracker with its tasks and per-member minutes
    #[instrument(skip(self))]
    pub async fn tracker_detail(
        &self,
        tracker_id: &DocumentId,
    ) -> ServiceResult<Option<TrackerDetailResponse>> {
        let Some(tracker) = self.ctx.tracker_repo().find_by_id(tracker_id).await? else {
            debug!(tracker_id = %tracker_id, "Tracker not found");
            return Ok(None);
        };

        let tasks = self.tasks_of(tracker_id).await?;
        let users = self.ctx.user_repo().snapshot().await?;
        let member_minutes = member_minutes(&tracker, &tasks)
            .into_iter()
            .map(|(member_id, minutes)| {
                let profile = users.iter().find(|user| user.uid == member_id);
                MemberMinutesResponse {
                    name: profile.map_or_else(|| member_id.to_string(), |p| p.name.clone()),
                    position: profile.map(|p| p.position.to_string()).unwrap_or_default(),
                    member_id,
                    minutes,
                }
            })
            .collect();

        Ok(Some(TrackerDetailResponse {
            all_completed: all_completed(&tasks),
            tasks: tasks.iter().map(TrackerTaskResponse::from).collect(),
            tracker: TrackerResponse::from(tracker),
            member_minutes,
        }))
    }

    /// Totals across every tracker
    pub async fn summary(&self) -> ServiceResult<TrackerSummary> {
        let trackers = self.ctx.tracker_repo().snapshot().await?;
        let tasks = self.ctx.tracker_task_repo().snapshot().await?;
        Ok(tracker_summary(&trackers, &tasks))
    }

    // ========================================================================
    // Tracker tasks
    // ========================================================================

    /// Log a member task on a tracker; `Ok(None)` when the tracker is gone
    #[instrument(skip(self, request))]
    pub async fn add_task(
        &self,
        request: CreateTrackerTaskRequest,
    ) -> ServiceResult<Option<TrackerTaskResponse>> {
        request.validate()?;

        PermissionService::new(self.ctx)
            .require_capability(Capabilities::MANAGE_TRACKERS)
            .await?;

        let tracker_id = DocumentId::new(request.tracker_id.trim());
        if self.ctx.tracker_repo().find_by_id(&tracker_id).await?.is_none() {
            warn!(tracker_id = %tracker_id, "Tracker vanished before adding a task");
            return Ok(None);
        }

        let task = TrackerTask::new(
            tracker_id,
            UserId::new(request.member_id.trim()),
            request.description.trim().to_string(),
            request.minutes,
        );
        let task = self.ctx.tracker_task_repo().create(task).await?;

        info!(
            task_id = %task.id,
            tracker_id = %task.tracker_id,
            member_id = %task.member_id,
            minutes = task.minutes,
            "Tracker task added"
        );
        Ok(Some(TrackerTaskResponse::from(task)))
    }

    /// Edit a tracker task
    #[instrument(skip(self, request))]
    pub async fn update_task(
        &self,
        task_id: &DocumentId,
        request: UpdateTrackerTaskRequest,
    ) -> ServiceResult<Option<TrackerTaskResponse>> {
        request.validate()?;

        PermissionService::new(self.ctx)
            .require_capability(Capabilities::MANAGE_TRACKERS)
            .await?;

        let Some(mut task) = self.ctx.tracker_task_repo().find_by_id(task_id).await? else {
            warn!(task_id = %task_id, "Tracker task vanished before update");
            return Ok(None);
        };

        if let Some(description) = request.description {
            task.description = description.trim().to_string();
        }
        if let Some(minutes) = request.minutes {
            task.minutes = minutes;
        }
        if let Some(member_id) = request.member_id {
            task.member_id = UserId::new(member_id.trim());
        }

        if !self.ctx.tracker_task_repo().update(&task).await.or_stale()? {
            warn!(task_id = %task_id, "Tracker task vanished before update");
            return Ok(None);
        }
        Ok(Some(TrackerTaskResponse::from(task)))
    }

    /// Remove a tracker task
    #[instrument(skip(self))]
    pub async fn delete_task(&self, task_id: &DocumentId) -> ServiceResult<Option<TrackerTaskResponse>> {
        PermissionService::new(self.ctx)
            .require_capability(Capabilities::MANAGE_TRACKERS)
            .await?;

        let Some(task) = self.ctx.tracker_task_repo().find_by_id(task_id).await? else {
            warn!(task_id = %task_id, "Tracker task already deleted");
            return Ok(None);
        };
        self.ctx.tracker_task_repo().delete(task_id).await?;

        info!(task_id = %task_id, tracker_id = %task.tracker_id, "Tracker task deleted");
        Ok(Some(TrackerTaskResponse::from(task)))
    }

    /// Flip a tracker task's completion and report the tracker roll-up
    ///
    /// Allowed for tracker managers and for the member the task belongs to.
    #[instrument(skip(self))]
    pub async fn toggle_task(&self, task_id: &DocumentId) -> ServiceResult<Option<TrackerToggleResponse>> {
        let actor = PermissionService::new(self.ctx).actor().await?;

        let Some(mut task) = self.ctx.tracker_task_repo().find_by_id(task_id).await? else {
            warn!(task_id = %task_id, "Tracker task vanished before toggle");
            return Ok(None);
        };

        if !actor.capabilities().has(Capabilities::MANAGE_TRACKERS) && &task.member_id != actor.id() {
            return Err(ServiceError::permission_denied(
                Capabilities::MANAGE_TRACKERS.list().join(", "),
            ));
        }

        task.completed = !task.completed;
        if !self.ctx.tracker_task_repo().update(&task).await.or_stale()? {
            warn!(task_id = %task_id, "Tracker task vanished before toggle");
            return Ok(None);
        }

        let siblings = self.tasks_of(&task.tracker_id).await?;
        let all_completed = all_completed(&siblings);
        info!(
            task_id = %task_id,
            tracker_id = %task.tracker_id,
            completed = task.completed,
            all_completed,
            "Tracker task toggled"
        );

        Ok(Some(TrackerToggleResponse {
            task: TrackerTaskResponse::from(task),
            all_completed,
        }))
    }
}
