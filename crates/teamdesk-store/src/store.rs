//! The full set of collections plus JSON seed loading

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use teamdesk_core::error::DomainError;
use teamdesk_core::traits::RepoResult;
use teamdesk_core::{
    AttendanceRecord, LoginHistoryEntry, MinuteTracker, Task, TaskHistoryEntry,
    TrackerHistoryEntry, TrackerTask, UserProfile,
};

use crate::collection::MemoryCollection;

/// Initial documents, keyed by collection name
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Seed {
    pub users: Vec<UserProfile>,
    pub tasks: Vec<Task>,
    pub task_history: Vec<TaskHistoryEntry>,
    pub login_history: Vec<LoginHistoryEntry>,
    pub minute_trackers: Vec<MinuteTracker>,
    pub minute_tracker_tasks: Vec<TrackerTask>,
    pub minute_tracker_history: Vec<TrackerHistoryEntry>,
    pub attendance: Vec<AttendanceRecord>,
}

impl Seed {
    pub fn from_json(json: &str) -> RepoResult<Self> {
        serde_json::from_str(json).map_err(|e| DomainError::StoreError(format!("invalid seed: {e}")))
    }

    pub async fn from_file(path: &Path) -> RepoResult<Self> {
        let body = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DomainError::StoreError(format!("{}: {e}", path.display())))?;
        Self::from_json(&body)
    }
}

/// Every collection of the workspace, each shareable as a repository
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub users: Arc<MemoryCollection<UserProfile>>,
    pub tasks: Arc<MemoryCollection<Task>>,
    pub task_history: Arc<MemoryCollection<TaskHistoryEntry>>,
    pub login_history: Arc<MemoryCollection<LoginHistoryEntry>>,
    pub trackers: Arc<MemoryCollection<MinuteTracker>>,
    pub tracker_tasks: Arc<MemoryCollection<TrackerTask>>,
    pub tracker_history: Arc<MemoryCollection<TrackerHistoryEntry>>,
    pub attendance: Arc<MemoryCollection<AttendanceRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, seed: Seed) {
        info!(
            users = seed.users.len(),
            tasks = seed.tasks.len(),
            trackers = seed.minute_trackers.len(),
            "Loading seed data"
        );
        self.users.seed(seed.users);
        self.tasks.seed(seed.tasks);
        self.task_history.seed(seed.task_history);
        self.login_history.seed(seed.login_history);
        self.trackers.seed(seed.minute_trackers);
        self.tracker_tasks.seed(seed.minute_tracker_tasks);
        self.tracker_history.seed(seed.minute_tracker_history);
        self.attendance.seed(seed.attendance);
    }

    pub async fn load_file(&self, path: &Path) -> RepoResult<()> {
        let seed = Seed::from_file(path).await?;
        self.load(seed);
        Ok(())
    }
}
