//! User profile entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AccessLevel, Capabilities, Position, Role, UserId};

/// Display name used when a profile document carries none
pub const DEFAULT_USER_NAME: &str = "New User";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetails {
    pub course: String,
    pub year: u8,
    pub student_id: String,
}

impl StudentDetails {
    /// Details generated for a self-registered student
    pub fn generated(uid: &UserId) -> Self {
        let prefix: String = uid.as_str().chars().take(6).collect();
        Self {
            course: "Unknown".to_string(),
            year: 1,
            student_id: format!("STU-{}", prefix.to_uppercase()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffDetails {
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub access_level: AccessLevel,
}

fn default_name() -> String {
    DEFAULT_USER_NAME.to_string()
}

/// User profile document, keyed by the identity provider's uid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: UserId,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub position: Position,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_details: Option<StudentDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_details: Option<StaffDetails>,
}

impl UserProfile {
    /// Create a profile with role-appropriate details
    ///
    /// Students get generated details and staff get access level 1 unless
    /// the caller fills them in afterwards.
    pub fn new(uid: UserId, name: String, email: String, role: Role) -> Self {
        let student_details = (role == Role::Student).then(|| StudentDetails::generated(&uid));
        let staff_details = (role == Role::Staff).then(StaffDetails::default);
        Self {
            uid,
            name,
            email,
            role,
            position: Position::member(),
            created_at: Utc::now(),
            last_active: None,
            student_details,
            staff_details,
        }
    }

    /// Profile created on first sign-in when no document exists
    pub fn placeholder(uid: UserId, email: String) -> Self {
        Self::new(uid, DEFAULT_USER_NAME.to_string(), email, Role::Student)
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Staff access level, `Standard` for everyone without staff details
    pub fn access_level(&self) -> AccessLevel {
        self.staff_details
            .as_ref()
            .map(|details| details.access_level)
            .unwrap_or_default()
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::for_role(self.role, self.access_level())
    }

    /// Record a heartbeat
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.last_active = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_details_generated_from_uid() {
        let details = StudentDetails::generated(&UserId::from("abc123xyz"));
        assert_eq!(details.student_id, "STU-ABC123");
        assert_eq!(details.course, "Unknown");
        assert_eq!(details.year, 1);

        let short = StudentDetails::generated(&UserId::from("ab"));
        assert_eq!(short.student_id, "STU-AB");
    }

    #[test]
    fn test_new_profile_details_by_role() {
        let student = UserProfile::new(
            UserId::from("s1"),
            "Sam".to_string(),
            "sam@example.com".to_string(),
            Role::Student,
        );
        assert!(student.student_details.is_some());
        assert!(student.staff_details.is_none());

        let staff = UserProfile::new(
            UserId::from("t1"),
            "Tia".to_string(),
            "tia@example.com".to_string(),
            Role::Staff,
        );
        assert_eq!(staff.access_level(), AccessLevel::Standard);
        assert!(!staff.capabilities().has(Capabilities::MANAGE_TASKS));
    }

    #[test]
    fn test_legacy_document_defaults() {
        let json = r#"{
            "uid": "old-1",
            "role": "member",
            "createdAt": "2025-09-01T00:00:00Z"
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.role, Role::Student);
        assert_eq!(profile.name, DEFAULT_USER_NAME);
        assert_eq!(profile.position.as_str(), "Member");
        assert!(profile.last_active.is_none());
    }

    #[test]
    fn test_elevated_staff_capabilities() {
        let json = r#"{
            "uid": "st-2",
            "name": "Lee",
            "email": "lee@example.com",
            "role": "staff",
            "position": "Staff",
            "createdAt": "2025-09-01T00:00:00Z",
            "staffDetails": { "department": "Ops", "designation": "Coordinator", "accessLevel": 2 }
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert!(profile.capabilities().has(Capabilities::MANAGE_TASKS));
        assert!(!profile.capabilities().has(Capabilities::MANAGE_USERS));
    }
}
