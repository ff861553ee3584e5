//! Ports to the external collaborators: document store, identity, export

mod export;
mod identity;
mod record;
mod repositories;

pub use export::{ExportSink, Row, Sheet};
pub use identity::{Identity, IdentityProvider};
pub use record::{Record, SortDirection};
pub use repositories::{
    AttendanceRepository, LoginHistoryRepository, RepoResult, Repository, SnapshotReceiver,
    TaskHistoryRepository, TaskRepository, TrackerHistoryRepository, TrackerRepository,
    TrackerTaskRepository, UserRepository,
};
