//! Presence service
//!
//! Keeps `lastActive` of the signed-in user fresh and answers who is
//! online and who has gone quiet.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::dto::UserResponse;

use super::context::ServiceContext;
use super::error::{ServiceResult, StaleWrite};
use super::permission::PermissionService;

/// Presence service
pub struct PresenceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PresenceService<'a> {
    /// Create a new PresenceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Stamp the signed-in user's profile as active now
    pub async fn heartbeat(&self) -> ServiceResult<bool> {
        self.heartbeat_at(Utc::now()).await
    }

    /// Stamp the signed-in user's profile as active at `at`
    ///
    /// Returns `false` when the user has no profile document yet.
    #[instrument(skip(self))]
    pub async fn heartbeat_at(&self, at: DateTime<Utc>) -> ServiceResult<bool> {
        let identity = PermissionService::new(self.ctx).current_identity().await?;

        let Some(mut profile) = self.ctx.user_repo().find_by_id(&identity.id).await? else {
            debug!(user_id = %identity.id, "No profile to stamp");
            return Ok(false);
        };

        profile.touch(at);
        let written = self.ctx.user_repo().update(&profile).await.or_stale()?;
        if written {
            debug!(user_id = %identity.id, "Heartbeat recorded");
        }
        Ok(written)
    }

    /// Members active within the online window
    pub async fn online_members(&self, now: DateTime<Utc>) -> ServiceResult<Vec<UserResponse>> {
        let users = self.ctx.user_repo().snapshot().await?;
        Ok(self
            .ctx
            .presence_policy()
            .online_members(&users, now)
            .into_iter()
            .map(UserResponse::from)
            .collect())
    }

    /// Members idle for longer than the inactivity threshold
    pub async fn inactive_members(&self, now: DateTime<Utc>) -> ServiceResult<Vec<UserResponse>> {
        let users = self.ctx.user_repo().snapshot().await?;
        Ok(self
            .ctx
            .presence_policy()
            .inactive_members(&users, now)
            .into_iter()
            .map(UserResponse::from)
            .collect())
    }
}

/// Stamp presence every `every` until `shutdown` flips to true
///
/// A failed heartbeat is logged and the loop keeps going.
pub fn spawn_heartbeat(
    ctx: Arc<ServiceContext>,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = PresenceService::new(&ctx).heartbeat().await {
                        warn!(error = %e, "Heartbeat failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Heartbeat stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{add_user, context_with, signed_in};
    use chrono::Duration as ChronoDuration;
    use teamdesk_core::{Repository, Role, UserId};
    use teamdesk_store::MemoryStore;

    #[tokio::test]
    async fn test_heartbeat_stamps_profile() {
        let (ctx, store, identity, _) = context_with(MemoryStore::new());
        signed_in(&store, &identity, "s1", Role::Student);
        let now = Utc::now();

        assert!(PresenceService::new(&ctx).heartbeat_at(now).await.unwrap());
        let profile = store.users.find_by_id(&UserId::from("s1")).await.unwrap().unwrap();
        assert_eq!(profile.last_active, Some(now));
    }

    #[tokio::test]
    async fn test_heartbeat_without_profile() {
        let (ctx, store, identity, _) = context_with(MemoryStore::new());
        let uid = UserId::from("ghost");
        identity.register(uid.clone(), "g@example.com", "Ghost", Role::Student, true);
        identity.sign_in(&uid).unwrap();

        assert!(!PresenceService::new(&ctx).heartbeat().await.unwrap());
        assert!(store.users.is_empty());
    }

    #[tokio::test]
    async fn test_online_and_inactive() {
        let (ctx, store, identity, _) = context_with(MemoryStore::new());
        signed_in(&store, &identity, "fresh", Role::Student);
        let mut stale = add_user(&store, &identity, "stale", Role::Student);
        let now = Utc::now();

        let service = PresenceService::new(&ctx);
        service.heartbeat_at(now - ChronoDuration::minutes(2)).await.unwrap();
        stale.touch(now - ChronoDuration::days(6));
        store.users.seed(vec![stale]);

        let online = service.online_members(now).await.unwrap();
        assert_eq!(online.len(), 1);
        assert_eq!(online[0].uid.as_str(), "fresh");

        let inactive = service.inactive_members(now).await.unwrap();
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].uid.as_str(), "stale");
    }

    #[tokio::test]
    async fn test_spawned_heartbeat_stops_on_shutdown() {
        let (ctx, store, identity, _) = context_with(MemoryStore::new());
        signed_in(&store, &identity, "s1", Role::Student);
        let ctx = Arc::new(ctx);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = spawn_heartbeat(ctx, Duration::from_millis(10), shutdown_rx);

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        let profile = store.users.find_by_id(&UserId::from("s1")).await.unwrap().unwrap();
        assert!(profile.last_active.is_some());
    }
}
