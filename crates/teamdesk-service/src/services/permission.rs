//! Permission service
//!
//! Resolves the signed-in user and checks role capabilities before any
//! store call is attempted.

use tracing::{debug, instrument};

use teamdesk_core::engine::StatsScope;
use teamdesk_core::traits::Identity;
use teamdesk_core::{Capabilities, DomainError, UserId, UserProfile};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// The signed-in account together with its profile document
#[derive(Debug, Clone)]
pub struct Actor {
    pub identity: Identity,
    pub profile: UserProfile,
}

impl Actor {
    #[inline]
    pub fn id(&self) -> &UserId {
        &self.identity.id
    }

    /// Name written into audit entries
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.profile.is_admin()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.profile.capabilities()
    }

    /// Admins see team-wide counts, everyone else their own view
    pub fn stats_scope(&self) -> StatsScope {
        if self.is_admin() {
            StatsScope::Global
        } else {
            StatsScope::Personal(self.id().clone())
        }
    }
}

/// Permission service for access control
pub struct PermissionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PermissionService<'a> {
    /// Create a new PermissionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The signed-in account, or `NotSignedIn`
    pub async fn current_identity(&self) -> ServiceResult<Identity> {
        self.ctx
            .identity()
            .current_user()
            .await?
            .ok_or(ServiceError::Domain(DomainError::NotSignedIn))
    }

    /// Resolve the signed-in user
    ///
    /// Without a profile document the profile is derived from the identity
    /// and is not written back.
    #[instrument(skip(self))]
    pub async fn actor(&self) -> ServiceResult<Actor> {
        let identity = self.current_identity().await?;
        let profile = match self.ctx.user_repo().find_by_id(&identity.id).await? {
            Some(profile) => profile,
            None => {
                debug!(user_id = %identity.id, "No profile document, using identity");
                UserProfile::new(
                    identity.id.clone(),
                    identity.display_name.clone(),
                    identity.email.clone(),
                    identity.role,
                )
            }
        };
        Ok(Actor { identity, profile })
    }

    /// Check whether the signed-in user holds a capability
    #[instrument(skip(self))]
    pub async fn check_capability(&self, capability: Capabilities) -> ServiceResult<bool> {
        let actor = self.actor().await?;
        Ok(actor.capabilities().has(capability))
    }

    /// Resolve the signed-in user and fail unless it holds `capability`
    #[instrument(skip(self))]
    pub async fn require_capability(&self, capability: Capabilities) -> ServiceResult<Actor> {
        let actor = self.actor().await?;
        if !actor.capabilities().has(capability) {
            debug!(user_id = %actor.id(), role = %actor.profile.role, "Capability denied");
            let names = capability.list().join(", ");
            return Err(ServiceError::permission_denied(names));
        }
        Ok(actor)
    }
}
