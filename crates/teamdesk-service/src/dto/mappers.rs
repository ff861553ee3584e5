//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use teamdesk_core::{
    AttendanceRecord, LoginHistoryEntry, MinuteTracker, Task, TaskHistoryEntry,
    TrackerHistoryEntry, TrackerTask, UserProfile,
};

use super::responses::{
    AttendanceResponse, LoginHistoryResponse, TaskHistoryResponse, TaskResponse,
    TrackerHistoryResponse, TrackerResponse, TrackerTaskResponse, UserResponse,
};

// ============================================================================
// Task Mappers
// ============================================================================

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date,
            assigned_to: task.assigned_to.clone(),
            status: task.status,
            priority: task.priority,
            created_at: task.created_at,
            created_by: task.created_by.clone(),
            completed_by: task.completed_by.clone(),
        }
    }
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self::from(&task)
    }
}

impl From<&TaskHistoryEntry> for TaskHistoryResponse {
    fn from(entry: &TaskHistoryEntry) -> Self {
        Self {
            id: entry.id.clone(),
            task_id: entry.task_id.clone(),
            user_id: entry.user_id.clone(),
            user_name: entry.user_name.clone(),
            action: entry.action,
            timestamp: entry.timestamp,
            task_title: entry.task_title.clone(),
        }
    }
}

// ============================================================================
// Minute Tracker Mappers
// ============================================================================

impl From<&TrackerHistoryEntry> for TrackerHistoryResponse {
    fn from(entry: &TrackerHistoryEntry) -> Self {
        Self {
            id: entry.id.clone(),
            tracker_id: entry.tracker_id.clone(),
            user_id: entry.user_id.clone(),
            user_name: entry.user_name.clone(),
            action: entry.action,
            minutes: entry.minutes,
            description: entry.description.clone(),
            timestamp: entry.timestamp,
        }
    }
}

impl From<&MinuteTracker> for TrackerResponse {
    fn from(tracker: &MinuteTracker) -> Self {
        Self {
            id: tracker.id.clone(),
            date: tracker.date,
            total_minutes: tracker.total_minutes,
            priority: tracker.priority,
            description: tracker.description.clone(),
            created_by: tracker.created_by.clone(),
            created_at: tracker.created_at,
            members: tracker.members.clone(),
            task_template: tracker.task_template.clone(),
        }
    }
}

impl From<MinuteTracker> for TrackerResponse {
    fn from(tracker: MinuteTracker) -> Self {
        Self::from(&tracker)
    }
}

impl From<&TrackerTask> for TrackerTaskResponse {
    fn from(task: &TrackerTask) -> Self {
        Self {
            id: task.id.clone(),
            description: task.description.clone(),
            minutes: task.minutes,
            completed: task.completed,
            member_id: task.member_id.clone(),
            tracker_id: task.tracker_id.clone(),
            created_at: task.created_at,
        }
    }
}

impl From<TrackerTask> for TrackerTaskResponse {
    fn from(task: TrackerTask) -> Self {
        Self::from(&task)
    }
}

// ============================================================================
// Attendance Mappers
// ============================================================================

impl From<&AttendanceRecord> for AttendanceResponse {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            id: record.id.clone(),
            user_id: record.user_id.clone(),
            user_name: record.user_name.clone(),
            date: record.date,
            time_in: record.time_in,
            time_out: record.time_out,
            status: record.status,
        }
    }
}

impl From<AttendanceRecord> for AttendanceResponse {
    fn from(record: AttendanceRecord) -> Self {
        Self::from(&record)
    }
}

// ============================================================================
// Member Mappers
// ============================================================================

impl From<&UserProfile> for UserResponse {
    fn from(user: &UserProfile) -> Self {
        Self {
            uid: user.uid.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            position: user.position.to_string(),
            badge: user.position.badge(),
            access_level: user.access_level(),
            created_at: user.created_at,
            last_active: user.last_active,
            student_details: user.student_details.clone(),
            staff_details: user.staff_details.clone(),
        }
    }
}

impl From<UserProfile> for UserResponse {
    fn from(user: UserProfile) -> Self {
        Self::from(&user)
    }
}

impl From<&LoginHistoryEntry> for LoginHistoryResponse {
    fn from(entry: &LoginHistoryEntry) -> Self {
        Self {
            id: entry.id.clone(),
            user_id: entry.user_id.clone(),
            user_name: entry.user_name.clone(),
            email: entry.email.clone(),
            login_time: entry.login_time,
            logout_time: entry.logout_time,
            duration_minutes: entry.duration_minutes(),
            ip_address: entry.ip_address.clone(),
            device_info: entry.device_info.clone(),
        }
    }
}

impl From<LoginHistoryEntry> for LoginHistoryResponse {
    fn from(entry: LoginHistoryEntry) -> Self {
        Self::from(&entry)
    }
}
