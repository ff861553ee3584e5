//! Test fixtures and data generators
//!
//! Provides reusable requests and documents for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};
use teamdesk_core::{AccessLevel, Priority, Role, StaffDetails, UserId, UserProfile};
use teamdesk_service::dto::{CreateTaskRequest, CreateTrackerRequest, CreateTrackerTaskRequest};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A fixed Monday noon used as "now" by scenarios
pub fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 6, 12, 0, 0).unwrap()
}

/// Same day as [`noon`] at the given hour
pub fn at_hour(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 6, hour, 0, 0).unwrap()
}

/// A profile for `uid` with predictable name and email
pub fn profile(uid: &str, role: Role) -> UserProfile {
    UserProfile::new(
        UserId::from(uid),
        format!("User {uid}"),
        format!("{uid}@example.com"),
        role,
    )
}

/// Staff profile with the given access level
pub fn staff_profile(uid: &str, access_level: AccessLevel) -> UserProfile {
    let mut staff = profile(uid, Role::Staff);
    staff.staff_details = Some(StaffDetails {
        department: "Operations".to_string(),
        designation: "Coordinator".to_string(),
        access_level,
    });
    staff
}

/// Task due `due_in` from [`noon`], unassigned
pub fn task_request(due_in: Duration) -> CreateTaskRequest {
    CreateTaskRequest {
        title: format!("Task {}", unique_suffix()),
        description: "Prepare the weekly report".to_string(),
        due_date: noon() + due_in,
        priority: Priority::Medium,
        assigned_to: Vec::new(),
    }
}

/// Task assigned to the given users
pub fn assigned_task_request(due_in: Duration, assigned_to: &[&str]) -> CreateTaskRequest {
    CreateTaskRequest {
        assigned_to: assigned_to.iter().map(|uid| UserId::from(*uid)).collect(),
        ..task_request(due_in)
    }
}

/// Tracker dated [`noon`] with the given members
pub fn tracker_request(members: &[&str]) -> CreateTrackerRequest {
    CreateTrackerRequest {
        date: noon(),
        total_minutes: 120,
        priority: Priority::High,
        description: format!("Tracker {}", unique_suffix()),
        members: members.iter().map(|uid| UserId::from(*uid)).collect(),
        task_template: None,
    }
}

/// Child task on a tracker
pub fn tracker_task_request(tracker_id: &str, member_id: &str, minutes: u32) -> CreateTrackerTaskRequest {
    CreateTrackerTaskRequest {
        tracker_id: tracker_id.to_string(),
        member_id: member_id.to_string(),
        description: format!("Step {}", unique_suffix()),
        minutes,
    }
}
