//! Team insights service

use chrono::{DateTime, Utc};
use tracing::instrument;

use teamdesk_core::engine::{completion_trend, tracker_minutes_trend, tracker_summary};
use teamdesk_core::Capabilities;

use crate::dto::{TeamInsightsResponse, UserResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::permission::PermissionService;

/// Team insights service
pub struct InsightService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InsightService<'a> {
    /// Create a new InsightService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Seven-day trends, tracker totals and presence (tracker managers)
    #[instrument(skip(self))]
    pub async fn team_insights(&self, now: DateTime<Utc>) -> ServiceResult<TeamInsightsResponse> {
        PermissionService::new(self.ctx)
            .require_capability(Capabilities::MANAGE_TRACKERS)
            .await?;

        let offset = self.ctx.attendance_policy().offset;
        let today = self.ctx.attendance_policy().date_of(now);

        let tasks = self.ctx.task_repo().snapshot().await?;
        let trackers = self.ctx.tracker_repo().snapshot().await?;
        let tracker_tasks = self.ctx.tracker_task_repo().snapshot().await?;
        let users = self.ctx.user_repo().snapshot().await?;
        let presence = self.ctx.presence_policy();

        Ok(TeamInsightsResponse {
            completion_trend: completion_trend(&tasks, today, offset),
            tracker_minutes_trend: tracker_minutes_trend(&trackers, today, offset),
            tracker_summary: tracker_summary(&trackers, &tracker_tasks),
            online_members: presence
                .online_members(&users, now)
                .into_iter()
                .map(UserResponse::from)
                .collect(),
            inactive_members: presence
                .inactive_members(&users, now)
                .into_iter()
                .map(UserResponse::from)
                .collect(),
        })
    }
}
