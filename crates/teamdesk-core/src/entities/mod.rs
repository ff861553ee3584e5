//! Domain entities - documents stored in the team workspace collections

mod attendance;
mod history;
mod task;
mod tracker;
mod user;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use history::{LoginHistoryEntry, TaskHistoryEntry, TrackerAction, TrackerHistoryEntry};
pub use task::{Priority, Task, TaskAction, TaskStatus};
pub use tracker::{MinuteTracker, TrackerTask};
pub use user::{StaffDetails, StudentDetails, UserProfile, DEFAULT_USER_NAME};
