//! # teamdesk-core
//!
//! Domain layer containing entities, value objects, the derivation engine,
//! collaborator ports and notifications.
//! This crate has no dependencies on infrastructure (store, identity provider, exporters).

pub mod engine;
pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AttendanceRecord, AttendanceStatus, LoginHistoryEntry, MinuteTracker, Priority,
    StaffDetails, StudentDetails, Task, TaskAction, TaskHistoryEntry, TaskStatus, TrackerAction,
    TrackerHistoryEntry, TrackerTask, UserProfile, DEFAULT_USER_NAME,
};
pub use error::DomainError;
pub use events::Notification;
pub use traits::{
    AttendanceRepository, ExportSink, Identity, IdentityProvider, LoginHistoryRepository, Record,
    RepoResult, Repository, Row, Sheet, SnapshotReceiver, SortDirection, TaskHistoryRepository,
    TaskRepository, TrackerHistoryRepository, TrackerRepository, TrackerTaskRepository,
    UserRepository,
};
pub use value_objects::{
    AccessLevel, Capabilities, DocumentId, IdParseError, Position, PositionBadge, Role, UserId,
};
