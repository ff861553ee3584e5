//! In-memory identity provider

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use teamdesk_core::error::DomainError;
use teamdesk_core::traits::{Identity, IdentityProvider, RepoResult};
use teamdesk_core::value_objects::{Role, UserId};

#[derive(Debug, Clone)]
struct Account {
    email: String,
    display_name: String,
    email_verified: bool,
    role: Role,
}

/// Accounts held in memory with a single signed-in slot
#[derive(Default)]
pub struct MemoryIdentityProvider {
    accounts: DashMap<UserId, Account>,
    current: RwLock<Option<UserId>>,
    verifications_sent: DashMap<UserId, usize>,
    failing_email_updates: AtomicUsize,
}

impl MemoryIdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing account under a known uid
    pub fn register(
        &self,
        user_id: UserId,
        email: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
        email_verified: bool,
    ) {
        self.accounts.insert(
            user_id,
            Account {
                email: email.into(),
                display_name: display_name.into(),
                email_verified,
                role,
            },
        );
    }

    pub fn sign_in(&self, user_id: &UserId) -> RepoResult<()> {
        if !self.accounts.contains_key(user_id) {
            return Err(DomainError::UserNotFound(user_id.clone()));
        }
        *self.current.write() = Some(user_id.clone());
        Ok(())
    }

    pub fn sign_out(&self) {
        *self.current.write() = None;
    }

    pub fn mark_verified(&self, user_id: &UserId) {
        if let Some(mut account) = self.accounts.get_mut(user_id) {
            account.email_verified = true;
        }
    }

    /// Make the next `count` email updates fail
    pub fn fail_next_email_updates(&self, count: usize) {
        self.failing_email_updates.store(count, Ordering::SeqCst);
    }

    pub fn email_of(&self, user_id: &UserId) -> Option<String> {
        self.accounts.get(user_id).map(|account| account.email.clone())
    }

    pub fn verifications_sent(&self, user_id: &UserId) -> usize {
        self.verifications_sent.get(user_id).map_or(0, |count| *count)
    }

    fn identity_of(&self, user_id: &UserId) -> Option<Identity> {
        self.accounts.get(user_id).map(|account| Identity {
            id: user_id.clone(),
            display_name: account.display_name.clone(),
            email: account.email.clone(),
            email_verified: account.email_verified,
            role: account.role,
        })
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn current_user(&self) -> RepoResult<Option<Identity>> {
        let current = self.current.read().clone();
        Ok(current.and_then(|id| self.identity_of(&id)))
    }

    #[instrument(skip(self, password))]
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        role: Role,
    ) -> RepoResult<UserId> {
        if password.len() < 6 {
            return Err(DomainError::ValidationError(
                "Password should be at least 6 characters".to_string(),
            ));
        }
        if self
            .accounts
            .iter()
            .any(|account| account.email.eq_ignore_ascii_case(email))
        {
            return Err(DomainError::EmailAlreadyExists);
        }

        let user_id = UserId::new(Uuid::new_v4().simple().to_string());
        self.register(user_id.clone(), email, display_name, role, false);
        info!(user_id = %user_id, "Account created");
        Ok(user_id)
    }

    #[instrument(skip(self))]
    async fn update_email(&self, user_id: &UserId, email: &str) -> RepoResult<()> {
        let pending = self.failing_email_updates.load(Ordering::SeqCst);
        if pending > 0 {
            self.failing_email_updates.store(pending - 1, Ordering::SeqCst);
            warn!(user_id = %user_id, "Injected email update failure");
            return Err(DomainError::IdentityError(
                "requires recent login".to_string(),
            ));
        }

        let mut account = self
            .accounts
            .get_mut(user_id)
            .ok_or_else(|| DomainError::UserNotFound(user_id.clone()))?;
        account.email = email.to_string();
        account.email_verified = false;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn send_verification(&self, user_id: &UserId) -> RepoResult<()> {
        if !self.accounts.contains_key(user_id) {
            return Err(DomainError::UserNotFound(user_id.clone()));
        }
        *self.verifications_sent.entry(user_id.clone()).or_insert(0) += 1;
        Ok(())
    }
}
