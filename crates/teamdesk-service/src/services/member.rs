//! Member service
//!
//! Profile management for admins and email changes for the signed-in user.

use tracing::{error, info, instrument, warn};
use validator::Validate;

use teamdesk_core::traits::Identity;
use teamdesk_core::{
    Capabilities, DomainError, Position, UserId, UserProfile, DEFAULT_USER_NAME,
};

use crate::dto::{ChangeEmailRequest, CreateUserRequest, UpdateUserRequest, UserResponse};

use super::context::ServiceContext;
use super::error::{ServiceResult, StaleWrite};
use super::permission::PermissionService;

/// Member service
pub struct MemberService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MemberService<'a> {
    /// Create a new MemberService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an account and its profile (admin)
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_user(&self, request: CreateUserRequest) -> ServiceResult<UserResponse> {
        request.validate()?;

        PermissionService::new(self.ctx)
            .require_capability(Capabilities::MANAGE_USERS)
            .await?;

        let name = request.name.trim().to_string();
        let uid = self
            .ctx
            .identity()
            .create_account(&request.email, &request.password, &name, request.role)
            .await?;

        let mut profile = UserProfile::new(uid, name, request.email, request.role);
        if let Some(position) = request.position.filter(|p| !p.trim().is_empty()) {
            profile.position = Position::new(position.trim());
        }
        if request.student_details.is_some() {
            profile.student_details = request.student_details;
        }
        if request.staff_details.is_some() {
            profile.staff_details = request.staff_details;
        }

        let profile = self.ctx.user_repo().create(profile).await?;
        info!(user_id = %profile.uid, role = %profile.role, "Member created");
        Ok(UserResponse::from(profile))
    }

    /// Edit a member's profile (admin); `Ok(None)` when it no longer exists
    #[instrument(skip(self, request))]
    pub async fn update_user(
        &self,
        user_id: &UserId,
        request: UpdateUserRequest,
    ) -> ServiceResult<Option<UserResponse>> {
        request.validate()?;

        PermissionService::new(self.ctx)
            .require_capability(Capabilities::MANAGE_USERS)
            .await?;

        let Some(mut profile) = self.ctx.user_repo().find_by_id(user_id).await? else {
            warn!(user_id = %user_id, "Profile vanished before update");
            return Ok(None);
        };

        if let Some(name) = request.name {
            profile.name = name.trim().to_string();
        }
        if let Some(role) = request.role {
            profile.role = role;
        }
        if let Some(position) = request.position {
            profile.position = Position::new(position.trim());
        }
        if request.student_details.is_some() {
            profile.student_details = request.student_details;
        }
        if request.staff_details.is_some() {
            profile.staff_details = request.staff_details;
        }

        if !self.ctx.user_repo().update(&profile).await.or_stale()? {
            warn!(user_id = %user_id, "Profile vanished before update");
            return Ok(None);
        }

        info!(user_id = %user_id, role = %profile.role, "Member updated");
        Ok(Some(UserResponse::from(profile)))
    }

    /// Delete a member's profile document (admin)
    ///
    /// The identity provider account is left in place.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: &UserId) -> ServiceResult<Option<UserResponse>> {
        let actor = PermissionService::new(self.ctx)
            .require_capability(Capabilities::MANAGE_USERS)
            .await?;

        let Some(profile) = self.ctx.user_repo().find_by_id(user_id).await? else {
            warn!(user_id = %user_id, "Profile already deleted");
            return Ok(None);
        };
        self.ctx.user_repo().delete(user_id).await?;

        info!(user_id = %user_id, deleted_by = %actor.id(), "Member deleted");
        Ok(Some(UserResponse::from(profile)))
    }

    /// Every member, leaders first, then by name
    pub async fn members(&self) -> ServiceResult<Vec<UserResponse>> {
        let mut users = self.ctx.user_repo().snapshot().await?;
        users.sort_by_key(|user| user.position.rank());
        Ok(users.iter().map(UserResponse::from).collect())
    }

    pub async fn profile(&self, user_id: &UserId) -> ServiceResult<Option<UserResponse>> {
        let profile = self.ctx.user_repo().find_by_id(user_id).await?;
        Ok(profile.map(UserResponse::from))
    }

    /// Profile for `identity`, created from the identity when missing
    #[instrument(skip(self, identity), fields(user_id = %identity.id))]
    pub async fn ensure_profile(&self, identity: &Identity) -> ServiceResult<UserProfile> {
        if let Some(profile) = self.ctx.user_repo().find_by_id(&identity.id).await? {
            return Ok(profile);
        }

        let name = if identity.display_name.trim().is_empty() {
            DEFAULT_USER_NAME.to_string()
        } else {
            identity.display_name.clone()
        };
        let profile = UserProfile::new(
            identity.id.clone(),
            name,
            identity.email.clone(),
            identity.role,
        );
        let profile = self.ctx.user_repo().create(profile).await?;

        info!(role = %profile.role, "Profile created on first sign-in");
        Ok(profile)
    }

    /// Change the signed-in user's email
    ///
    /// Non-admins need a verified email first. The profile document is
    /// written before the identity provider; when the provider refuses, the
    /// profile email is put back and the provider's error is returned.
    #[instrument(skip(self, request))]
    pub async fn change_email(&self, request: ChangeEmailRequest) -> ServiceResult<Option<UserResponse>> {
        request.validate()?;

        let actor = PermissionService::new(self.ctx).actor().await?;
        if !actor.is_admin() && !actor.identity.email_verified {
            return Err(DomainError::EmailNotVerified.into());
        }

        let new_email = request.email.trim().to_string();
        let previous = actor.profile.email.clone();
        let mut profile = actor.profile;
        profile.email.clone_from(&new_email);

        if !self.ctx.user_repo().update(&profile).await.or_stale()? {
            warn!(user_id = %profile.uid, "Profile vanished before email change");
            return Ok(None);
        }

        if let Err(err) = self
            .ctx
            .identity()
            .update_email(&profile.uid, &new_email)
            .await
        {
            warn!(user_id = %profile.uid, error = %err, "Identity provider refused email change");
            profile.email = previous;
            if let Err(restore_err) = self.ctx.user_repo().update(&profile).await {
                error!(
                    user_id = %profile.uid,
                    error = %restore_err,
                    "Failed to restore profile email"
                );
            }
            return Err(err.into());
        }

        if let Err(err) = self.ctx.identity().send_verification(&profile.uid).await {
            warn!(user_id = %profile.uid, error = %err, "Verification email not sent");
        }

        info!(user_id = %profile.uid, "Email changed");
        Ok(Some(UserResponse::from(profile)))
    }

    /// Send a verification email to the signed-in user
    #[instrument(skip(self))]
    pub async fn send_verification(&self) -> ServiceResult<()> {
        let identity = PermissionService::new(self.ctx).current_identity().await?;
        self.ctx.identity().send_verification(&identity.id).await?;
        info!(user_id = %identity.id, "Verification email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{add_user, context_with, signed_in};
    use crate::services::ServiceError;
    use teamdesk_core::traits::Repository;
    use teamdesk_core::{AccessLevel, PositionBadge, Role, StaffDetails};
    use teamdesk_store::MemoryStore;

    fn create_request(email: &str, role: Role) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            password: "secret1".to_string(),
            name: "Casey".to_string(),
            role,
            position: Some("Co-Leader".to_string()),
            student_details: None,
            staff_details: None,
        }
    }

    #[tokio::test]
    async fn test_admin_creates_student() {
        let (ctx, store, identity, _) = context_with(MemoryStore::new());
        signed_in(&store, &identity, "admin", Role::Admin);

        let user = MemberService::new(&ctx)
            .create_user(create_request("casey@example.com", Role::Student))
            .await
            .unwrap();
        assert_eq!(user.badge, PositionBadge::CoLeader);
        let details = user.student_details.unwrap();
        assert!(details.student_id.starts_with("STU-"));
        assert_eq!(identity.email_of(&user.uid).unwrap(), "casey@example.com");
    }

    #[tokio::test]
    async fn test_staff_cannot_manage_members() {
        let (ctx, store, identity, _) = context_with(MemoryStore::new());
        signed_in(&store, &identity, "staff", Role::Staff);
        let service = MemberService::new(&ctx);

        let err = service
            .create_user(create_request("x@example.com", Role::Student))
            .await
            .unwrap_err();
        assert!(err.is_authorization());

        let err = service.delete_user(&UserId::from("staff")).await.unwrap_err();
        assert!(err.is_authorization());
        assert_eq!(store.users.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let (ctx, store, identity, _) = context_with(MemoryStore::new());
        signed_in(&store, &identity, "admin", Role::Admin);
        let service = MemberService::new(&ctx);

        service
            .create_user(create_request("dup@example.com", Role::Staff))
            .await
            .unwrap();
        let err = service
            .create_user(create_request("dup@example.com", Role::Staff))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::EmailAlreadyExists)));
    }

    #[tokio::test]
    async fn test_update_staff_access_level() {
        let (ctx, store, identity, _) = context_with(MemoryStore::new());
        signed_in(&store, &identity, "admin", Role::Admin);
        add_user(&store, &identity, "staff", Role::Staff);

        let updated = MemberService::new(&ctx)
            .update_user(
                &UserId::from("staff"),
                UpdateUserRequest {
                    staff_details: Some(StaffDetails {
                        department: "Ops".to_string(),
                        designation: "Lead".to_string(),
                        access_level: AccessLevel::Elevated,
                    }),
                    ..UpdateUserRequest::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.access_level, AccessLevel::Elevated);

        let missing = MemberService::new(&ctx)
            .update_user(&UserId::from("ghost"), UpdateUserRequest::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_members_sorted_by_position() {
        let (ctx, store, identity, _) = context_with(MemoryStore::new());
        signed_in(&store, &identity, "admin", Role::Admin);
        let mut leader = add_user(&store, &identity, "zed", Role::Student);
        leader.position = Position::from("Leader");
        store.users.seed(vec![leader]);

        let members = MemberService::new(&ctx).members().await.unwrap();
        assert_eq!(members[0].uid, UserId::from("zed"));
    }

    #[tokio::test]
    async fn test_change_email_requires_verification() {
        let (ctx, store, identity, _) = context_with(MemoryStore::new());
        let uid = UserId::from("s1");
        identity.register(uid.clone(), "s1@example.com", "S", Role::Student, false);
        store.users.seed(vec![UserProfile::new(
            uid.clone(),
            "S".to_string(),
            "s1@example.com".to_string(),
            Role::Student,
        )]);
        identity.sign_in(&uid).unwrap();

        let err = MemberService::new(&ctx)
            .change_email(ChangeEmailRequest {
                email: "new@example.com".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.is_authorization());
        assert_eq!(identity.email_of(&uid).unwrap(), "s1@example.com");
    }

    #[tokio::test]
    async fn test_change_email_restores_profile_on_failure() {
        let (ctx, store, identity, _) = context_with(MemoryStore::new());
        signed_in(&store, &identity, "s1", Role::Student);
        let uid = UserId::from("s1");

        identity.fail_next_email_updates(1);
        let err = MemberService::new(&ctx)
            .change_email(ChangeEmailRequest {
                email: "new@example.com".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.is_store_failure());

        let profile = store.users.find_by_id(&uid).await.unwrap().unwrap();
        assert_eq!(profile.email, "s1@example.com");
        assert_eq!(identity.email_of(&uid).unwrap(), "s1@example.com");
    }

    #[tokio::test]
    async fn test_change_email_success_sends_verification() {
        let (ctx, store, identity, _) = context_with(MemoryStore::new());
        signed_in(&store, &identity, "s1", Role::Student);
        let uid = UserId::from("s1");

        let updated = MemberService::new(&ctx)
            .change_email(ChangeEmailRequest {
                email: "new@example.com".to_string(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.email, "new@example.com");
        assert_eq!(identity.email_of(&uid).unwrap(), "new@example.com");
        assert_eq!(identity.verifications_sent(&uid), 1);
    }

    #[tokio::test]
    async fn test_ensure_profile_creates_once() {
        let (ctx, _, identity, _) = context_with(MemoryStore::new());
        let uid = UserId::from("fresh");
        identity.register(uid.clone(), "f@example.com", "", Role::Student, true);
        identity.sign_in(&uid).unwrap();

        let current = PermissionService::new(&ctx).current_identity().await.unwrap();
        let service = MemberService::new(&ctx);
        let profile = service.ensure_profile(&current).await.unwrap();
        assert_eq!(profile.name, DEFAULT_USER_NAME);
        assert_eq!(profile.student_details.unwrap().student_id, "STU-FRESH");

        let again = service.ensure_profile(&current).await.unwrap();
        assert_eq!(again.created_at, profile.created_at);
    }
}
