//! Repository traits (ports) - define the interface for data access
//!
//! The document store owns persistence, ordering and concurrency. The domain
//! only needs CRUD by id and a realtime stream of full, ordered snapshots.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use super::record::Record;
use crate::entities::{
    AttendanceRecord, LoginHistoryEntry, MinuteTracker, Task, TaskHistoryEntry,
    TrackerHistoryEntry, TrackerTask, UserProfile,
};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Receiver side of a collection subscription
///
/// Each value is a complete snapshot that replaces the previous one.
pub type SnapshotReceiver<T> = watch::Receiver<Arc<Vec<T>>>;

#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// Find a record by id
    async fn find_by_id(&self, id: &T::Id) -> RepoResult<Option<T>>;

    /// Current ordered snapshot of the collection
    async fn snapshot(&self) -> RepoResult<Vec<T>>;

    /// Create a record, issuing an id when it has none
    async fn create(&self, record: T) -> RepoResult<T>;

    /// Replace an existing record
    async fn update(&self, record: &T) -> RepoResult<()>;

    /// Delete a record; deleting a missing id is not an error
    async fn delete(&self, id: &T::Id) -> RepoResult<()>;

    /// Subscribe to ordered snapshots, starting with the current one
    fn subscribe(&self) -> SnapshotReceiver<T>;
}

pub type TaskRepository = dyn Repository<Task>;
pub type TaskHistoryRepository = dyn Repository<TaskHistoryEntry>;
pub type LoginHistoryRepository = dyn Repository<LoginHistoryEntry>;
pub type TrackerRepository = dyn Repository<MinuteTracker>;
pub type TrackerTaskRepository = dyn Repository<TrackerTask>;
pub type TrackerHistoryRepository = dyn Repository<TrackerHistoryEntry>;
pub type AttendanceRepository = dyn Repository<AttendanceRecord>;
pub type UserRepository = dyn Repository<UserProfile>;
