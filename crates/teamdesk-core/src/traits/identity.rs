//! Identity provider port

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::repositories::RepoResult;
use crate::value_objects::{Role, UserId};

/// The signed-in account as the identity provider reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: UserId,
    pub display_name: String,
    pub email: String,
    pub email_verified: bool,
    pub role: Role,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Currently signed-in account, if any
    async fn current_user(&self) -> RepoResult<Option<Identity>>;

    /// Register a new account and return its uid
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        role: Role,
    ) -> RepoResult<UserId>;

    /// Change the sign-in email of an account
    async fn update_email(&self, user_id: &UserId, email: &str) -> RepoResult<()>;

    /// Send a verification email to the account's current address
    async fn send_verification(&self, user_id: &UserId) -> RepoResult<()>;
}
