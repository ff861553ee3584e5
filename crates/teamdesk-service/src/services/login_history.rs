//! Login history service
//!
//! Audits sign-ins and sign-outs. A sign-in without a profile document
//! creates one.

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use teamdesk_core::{Capabilities, DocumentId, LoginHistoryEntry};

use crate::dto::{LoginHistoryResponse, RecordLoginRequest};

use super::context::ServiceContext;
use super::error::{ServiceResult, StaleWrite};
use super::member::MemberService;
use super::permission::PermissionService;

/// Login history service
pub struct LoginHistoryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LoginHistoryService<'a> {
    /// Create a new LoginHistoryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record a sign-in of the current identity
    #[instrument(skip(self, request))]
    pub async fn record_login(
        &self,
        request: RecordLoginRequest,
        at: DateTime<Utc>,
    ) -> ServiceResult<LoginHistoryResponse> {
        let identity = PermissionService::new(self.ctx).current_identity().await?;
        let profile = MemberService::new(self.ctx).ensure_profile(&identity).await?;

        let mut entry = LoginHistoryEntry::new(
            identity.id.clone(),
            profile.name.clone(),
            identity.email.clone(),
            at,
        );
        entry.ip_address = request.ip_address;
        entry.device_info = request.device_info;

        let entry = self.ctx.login_history_repo().create(entry).await?;
        info!(user_id = %identity.id, entry_id = %entry.id, "Login recorded");
        Ok(LoginHistoryResponse::from(entry))
    }

    /// Close a login entry; `Ok(None)` when it no longer exists
    #[instrument(skip(self))]
    pub async fn record_logout(
        &self,
        entry_id: &DocumentId,
        at: DateTime<Utc>,
    ) -> ServiceResult<Option<LoginHistoryResponse>> {
        let Some(mut entry) = self.ctx.login_history_repo().find_by_id(entry_id).await? else {
            warn!(entry_id = %entry_id, "Login entry vanished before logout");
            return Ok(None);
        };

        entry.end(at);
        if !self.ctx.login_history_repo().update(&entry).await.or_stale()? {
            warn!(entry_id = %entry_id, "Login entry vanished before logout");
            return Ok(None);
        }

        info!(
            user_id = %entry.user_id,
            minutes = entry.duration_minutes().unwrap_or_default(),
            "Logout recorded"
        );
        Ok(Some(LoginHistoryResponse::from(entry)))
    }

    /// All entries, newest login first (admin)
    pub async fn entries(&self) -> ServiceResult<Vec<LoginHistoryResponse>> {
        PermissionService::new(self.ctx)
            .require_capability(Capabilities::MANAGE_USERS)
            .await?;
        let entries = self.ctx.login_history_repo().snapshot().await?;
        Ok(entries.iter().map(LoginHistoryResponse::from).collect())
    }

    /// Entries of sessions that have not been closed
    pub async fn active_sessions(&self) -> ServiceResult<Vec<LoginHistoryResponse>> {
        let entries = self.entries().await?;
        Ok(entries
            .into_iter()
            .filter(|entry| entry.logout_time.is_none())
            .collect())
    }

    /// Delete one entry (admin)
    #[instrument(skip(self))]
    pub async fn delete_entry(&self, entry_id: &DocumentId) -> ServiceResult<Option<LoginHistoryResponse>> {
        PermissionService::new(self.ctx)
            .require_capability(Capabilities::MANAGE_USERS)
            .await?;

        let Some(entry) = self.ctx.login_history_repo().find_by_id(entry_id).await? else {
            warn!(entry_id = %entry_id, "Login entry already deleted");
            return Ok(None);
        };
        self.ctx.login_history_repo().delete(entry_id).await?;

        info!(entry_id = %entry_id, "Login entry deleted");
        Ok(Some(LoginHistoryResponse::from(entry)))
    }

    /// Delete every entry that logged in before `cutoff` (admin)
    #[instrument(skip(self))]
    pub async fn purge_before(&self, cutoff: DateTime<Utc>) -> ServiceResult<usize> {
        PermissionService::new(self.ctx)
            .require_capability(Capabilities::MANAGE_USERS)
            .await?;

        let entries = self.ctx.login_history_repo().snapshot().await?;
        let mut purged = 0;
        for entry in entries.iter().filter(|entry| entry.login_time < cutoff) {
            self.ctx.login_history_repo().delete(&entry.id).await?;
            purged += 1;
        }

        info!(purged, cutoff = %cutoff, "Login history purged");
        Ok(purged)
    }
}
