//! Service context - dependency container for services
//!
//! Holds every collection, the identity provider, the export sink and the
//! policies the derivations are evaluated with.

use std::fmt;
use std::sync::Arc;

use teamdesk_core::engine::{AttendancePolicy, PresencePolicy};
use teamdesk_core::traits::{
    AttendanceRepository, ExportSink, IdentityProvider, LoginHistoryRepository,
    TaskHistoryRepository, TaskRepository, TrackerHistoryRepository, TrackerRepository,
    TrackerTaskRepository, UserRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the dependency container passed to every service. It provides:
/// - One repository per store collection
/// - The identity provider (signed-in account, email changes)
/// - The export sink
/// - Attendance and presence policies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<UserRepository>,
    task_repo: Arc<TaskRepository>,
    task_history_repo: Arc<TaskHistoryRepository>,
    login_history_repo: Arc<LoginHistoryRepository>,
    tracker_repo: Arc<TrackerRepository>,
    tracker_task_repo: Arc<TrackerTaskRepository>,
    tracker_history_repo: Arc<TrackerHistoryRepository>,
    attendance_repo: Arc<AttendanceRepository>,

    // Collaborators
    identity: Arc<dyn IdentityProvider>,
    export_sink: Arc<dyn ExportSink>,

    // Policies
    attendance_policy: AttendancePolicy,
    presence_policy: PresencePolicy,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &UserRepository {
        self.user_repo.as_ref()
    }

    pub fn task_repo(&self) -> &TaskRepository {
        self.task_repo.as_ref()
    }

    pub fn task_history_repo(&self) -> &TaskHistoryRepository {
        self.task_history_repo.as_ref()
    }

    pub fn login_history_repo(&self) -> &LoginHistoryRepository {
        self.login_history_repo.as_ref()
    }

    pub fn tracker_repo(&self) -> &TrackerRepository {
        self.tracker_repo.as_ref()
    }

    pub fn tracker_task_repo(&self) -> &TrackerTaskRepository {
        self.tracker_task_repo.as_ref()
    }

    pub fn tracker_history_repo(&self) -> &TrackerHistoryRepository {
        self.tracker_history_repo.as_ref()
    }

    pub fn attendance_repo(&self) -> &AttendanceRepository {
        self.attendance_repo.as_ref()
    }

    // === Collaborators ===

    /// Get the identity provider
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    /// Get the export sink
    pub fn export_sink(&self) -> &dyn ExportSink {
        self.export_sink.as_ref()
    }

    // === Policies ===

    pub fn attendance_policy(&self) -> &AttendancePolicy {
        &self.attendance_policy
    }

    pub fn presence_policy(&self) -> &PresencePolicy {
        &self.presence_policy
    }
}

impl fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContext")
            .field("attendance_policy", &self.attendance_policy)
            .field("presence_policy", &self.presence_policy)
            .finish_non_exhaustive()
    }
}

/// Builder for ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<UserRepository>>,
    task_repo: Option<Arc<TaskRepository>>,
    task_history_repo: Option<Arc<TaskHistoryRepository>>,
    login_history_repo: Option<Arc<LoginHistoryRepository>>,
    tracker_repo: Option<Arc<TrackerRepository>>,
    tracker_task_repo: Option<Arc<TrackerTaskRepository>>,
    tracker_history_repo: Option<Arc<TrackerHistoryRepository>>,
    attendance_repo: Option<Arc<AttendanceRepository>>,
    identity: Option<Arc<dyn IdentityProvider>>,
    export_sink: Option<Arc<dyn ExportSink>>,
    attendance_policy: AttendancePolicy,
    presence_policy: PresencePolicy,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn task_repo(mut self, repo: Arc<TaskRepository>) -> Self {
        self.task_repo = Some(repo);
        self
    }

    pub fn task_history_repo(mut self, repo: Arc<TaskHistoryRepository>) -> Self {
        self.task_history_repo = Some(repo);
        self
    }

    pub fn login_history_repo(mut self, repo: Arc<LoginHistoryRepository>) -> Self {
        self.login_history_repo = Some(repo);
        self
    }

    pub fn tracker_repo(mut self, repo: Arc<TrackerRepository>) -> Self {
        self.tracker_repo = Some(repo);
        self
    }

    pub fn tracker_task_repo(mut self, repo: Arc<TrackerTaskRepository>) -> Self {
        self.tracker_task_repo = Some(repo);
        self
    }

    pub fn tracker_history_repo(mut self, repo: Arc<TrackerHistoryRepository>) -> Self {
        self.tracker_history_repo = Some(repo);
        self
    }

    pub fn attendance_repo(mut self, repo: Arc<AttendanceRepository>) -> Self {
        self.attendance_repo = Some(repo);
        self
    }

    pub fn identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn export_sink(mut self, sink: Arc<dyn ExportSink>) -> Self {
        self.export_sink = Some(sink);
        self
    }

    pub fn attendance_policy(mut self, policy: AttendancePolicy) -> Self {
        self.attendance_policy = policy;
        self
    }

    pub fn presence_policy(mut self, policy: PresencePolicy) -> Self {
        self.presence_policy = policy;
        self
    }

    /// Build the context; every repository and collaborator is required
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            user_repo: self
                .user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            task_repo: self
                .task_repo
                .ok_or_else(|| ServiceError::validation("task_repo is required"))?,
            task_history_repo: self
                .task_history_repo
                .ok_or_else(|| ServiceError::validation("task_history_repo is required"))?,
            login_history_repo: self
                .login_history_repo
                .ok_or_else(|| ServiceError::validation("login_history_repo is required"))?,
            tracker_repo: self
                .tracker_repo
                .ok_or_else(|| ServiceError::validation("tracker_repo is required"))?,
            tracker_task_repo: self
                .tracker_task_repo
                .ok_or_else(|| ServiceError::validation("tracker_task_repo is required"))?,
            tracker_history_repo: self
                .tracker_history_repo
                .ok_or_else(|| ServiceError::validation("tracker_history_repo is required"))?,
            attendance_repo: self
                .attendance_repo
                .ok_or_else(|| ServiceError::validation("attendance_repo is required"))?,
            identity: self
                .identity
                .ok_or_else(|| ServiceError::validation("identity is required"))?,
            export_sink: self
                .export_sink
                .ok_or_else(|| ServiceError::validation("export_sink is required"))?,
            attendance_policy: self.attendance_policy,
            presence_policy: self.presence_policy,
        })
    }
}
