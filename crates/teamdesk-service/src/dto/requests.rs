//! Request DTOs for user actions
//!
//! All request DTOs implement `Deserialize` and `Validate`; services validate
//! them before any store call.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use teamdesk_core::{Priority, Role, StaffDetails, StudentDetails, UserId};

/// Rejects empty and whitespace-only text
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

// ============================================================================
// Task Requests
// ============================================================================

/// Create task request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(
        length(max = 200, message = "Title must be at most 200 characters"),
        custom(function = "not_blank", message = "Title is required")
    )]
    pub title: String,

    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,

    pub due_date: DateTime<Utc>,

    #[serde(default)]
    pub priority: Priority,

    /// Empty assigns the task to everyone
    #[serde(default)]
    pub assigned_to: Vec<UserId>,
}

/// Update task request; absent fields stay unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(
        length(max = 200, message = "Title must be at most 200 characters"),
        custom(function = "not_blank", message = "Title is required")
    )]
    pub title: Option<String>,

    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: Option<String>,

    pub due_date: Option<DateTime<Utc>>,

    pub priority: Option<Priority>,

    pub assigned_to: Option<Vec<UserId>>,
}

// ============================================================================
// Minute Tracker Requests
// ============================================================================

/// Create minute tracker request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrackerRequest {
    pub date: DateTime<Utc>,

    #[validate(range(min = 1, message = "Total minutes must be greater than zero"))]
    pub total_minutes: u32,

    #[serde(default)]
    pub priority: Priority,

    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,

    #[serde(default)]
    pub members: Vec<UserId>,

    pub task_template: Option<String>,
}

/// Update minute tracker request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrackerRequest {
    pub date: Option<DateTime<Utc>>,

    #[validate(range(min = 1, message = "Total minutes must be greater than zero"))]
    pub total_minutes: Option<u32>,

    pub priority: Option<Priority>,

    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: Option<String>,

    pub members: Option<Vec<UserId>>,

    pub task_template: Option<String>,
}

/// Add a task to a tracker
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrackerTaskRequest {
    #[validate(custom(function = "not_blank", message = "Tracker is required"))]
    pub tracker_id: String,

    #[validate(custom(function = "not_blank", message = "Member is required"))]
    pub member_id: String,

    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,

    #[validate(range(min = 1, message = "Minutes must be greater than zero"))]
    pub minutes: u32,
}

/// Update tracker task request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrackerTaskRequest {
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: Option<String>,

    #[validate(range(min = 1, message = "Minutes must be greater than zero"))]
    pub minutes: Option<u32>,

    #[validate(custom(function = "not_blank", message = "Member is required"))]
    pub member_id: Option<String>,
}

// ============================================================================
// Member Requests
// ============================================================================

/// Create member request (admin)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password should be at least 6 characters"))]
    pub password: String,

    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    pub role: Role,

    pub position: Option<String>,

    pub student_details: Option<StudentDetails>,

    pub staff_details: Option<StaffDetails>,
}

/// Update member request (admin)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: Option<String>,

    pub role: Option<Role>,

    pub position: Option<String>,

    pub student_details: Option<StudentDetails>,

    pub staff_details: Option<StaffDetails>,
}

/// Change the signed-in user's email
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

// ============================================================================
// Session Requests
// ============================================================================

/// Client details recorded with a login
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordLoginRequest {
    pub ip_address: Option<String>,
    pub device_info: Option<String>,
}
