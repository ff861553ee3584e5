//! Business logic services
//!
//! Each service borrows the shared `ServiceContext`, validates its input,
//! checks capabilities and only then touches the store.

pub mod attendance;
pub mod context;
pub mod error;
pub mod export;
pub mod insight;
pub mod login_history;
pub mod member;
pub mod permission;
pub mod presence;
pub mod session;
pub mod task;
pub mod tracker;

#[cfg(test)]
mod test_support;

// Re-export all services for convenience
pub use attendance::AttendanceService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use export::ExportService;
pub use insight::InsightService;
pub use login_history::LoginHistoryService;
pub use member::MemberService;
pub use permission::{Actor, PermissionService};
pub use presence::{spawn_heartbeat, PresenceService};
pub use session::DashboardSession;
pub use task::TaskService;
pub use tracker::TrackerService;
