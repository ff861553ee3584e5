//! Response DTOs for dashboard views
//!
//! All response DTOs implement `Serialize` with camelCase keys.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use teamdesk_core::engine::{TaskBucket, TaskStats, TrackerSummary, TrendPoint};
use teamdesk_core::{
    AccessLevel, AttendanceStatus, DocumentId, PositionBadge, Priority, Role, StaffDetails,
    StudentDetails, TaskAction, TaskStatus, TrackerAction, UserId,
};

// ============================================================================
// Task Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: DocumentId,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub assigned_to: Vec<UserId>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub created_by: UserId,
    pub completed_by: Vec<UserId>,
}

/// A task as one viewer sees it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCardResponse {
    #[serde(flatten)]
    pub task: TaskResponse,
    pub bucket: TaskBucket,
    pub completed_by_me: bool,
}

/// Counts plus the urgent list for the signed-in user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOverviewResponse {
    pub stats: TaskStats,
    pub urgent: Vec<TaskResponse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskHistoryResponse {
    pub id: DocumentId,
    pub task_id: DocumentId,
    pub user_id: UserId,
    pub user_name: String,
    pub action: TaskAction,
    pub timestamp: DateTime<Utc>,
    pub task_title: String,
}

// ============================================================================
// Minute Tracker Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerHistoryResponse {
    pub id: DocumentId,
    pub tracker_id: DocumentId,
    pub user_id: UserId,
    pub user_name: String,
    pub action: TrackerAction,
    pub minutes: u32,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerResponse {
    pub id: DocumentId,
    pub date: DateTime<Utc>,
    pub total_minutes: u32,
    pub priority: Priority,
    pub description: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub members: Vec<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_template: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerTaskResponse {
    pub id: DocumentId,
    pub description: String,
    pub minutes: u32,
    pub completed: bool,
    pub member_id: UserId,
    pub tracker_id: DocumentId,
    pub created_at: DateTime<Utc>,
}

/// Result of toggling a tracker task
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerToggleResponse {
    pub task: TrackerTaskResponse,
    /// Every task of the tracker is now completed
    pub all_completed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberMinutesResponse {
    pub member_id: UserId,
    /// Member id when the profile is missing
    pub name: String,
    pub position: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerDetailResponse {
    pub tracker: TrackerResponse,
    pub tasks: Vec<TrackerTaskResponse>,
    pub member_minutes: Vec<MemberMinutesResponse>,
    pub all_completed: bool,
}

// ============================================================================
// Attendance Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponse {
    pub id: DocumentId,
    pub user_id: UserId,
    pub user_name: String,
    pub date: NaiveDate,
    pub time_in: DateTime<Utc>,
    pub time_out: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
}

/// Today's clock state for the signed-in user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStateResponse {
    pub date: NaiveDate,
    pub clocked_in: bool,
    pub record: Option<AttendanceResponse>,
}

// ============================================================================
// Member Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub uid: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub position: String,
    pub badge: PositionBadge,
    pub access_level: AccessLevel,
    pub created_at: DateTime<Utc>,
    pub last_active: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_details: Option<StudentDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_details: Option<StaffDetails>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginHistoryResponse {
    pub id: DocumentId,
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub login_time: DateTime<Utc>,
    pub logout_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub ip_address: Option<String>,
    pub device_info: Option<String>,
}

/// Team-wide dashboard figures
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInsightsResponse {
    pub completion_trend: Vec<TrendPoint>,
    pub tracker_minutes_trend: Vec<TrendPoint>,
    pub tracker_summary: TrackerSummary,
    pub online_members: Vec<UserResponse>,
    pub inactive_members: Vec<UserResponse>,
}

// ============================================================================
// Export Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub file_name: String,
    pub sheets: usize,
    pub rows: usize,
}
