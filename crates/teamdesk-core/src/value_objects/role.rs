//! Roles, staff access levels and the capability flags derived from them

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role claim carried on a user profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    /// Older profile documents use `member` for the same role
    #[default]
    #[serde(alias = "member")]
    Student,
}

impl Role {
    #[inline]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "student" | "member" => Ok(Self::Student),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

/// Staff access level (1 = standard, 2 = may manage tasks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AccessLevel {
    #[default]
    Standard,
    Elevated,
}

impl TryFrom<u8> for AccessLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Standard),
            2 => Ok(Self::Elevated),
            other => Err(format!("access level must be 1 or 2, got {other}")),
        }
    }
}

impl From<AccessLevel> for u8 {
    fn from(level: AccessLevel) -> Self {
        match level {
            AccessLevel::Standard => 1,
            AccessLevel::Elevated => 2,
        }
    }
}

bitflags! {
    /// What an acting user may do
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Toggle own completion on visible tasks
        const COMPLETE_TASKS   = 1 << 0;
        /// Clock in and out
        const CLOCK_ATTENDANCE = 1 << 1;
        /// Export own task sheets
        const EXPORT_OWN       = 1 << 2;
        /// Create, edit and delete tasks
        const MANAGE_TASKS     = 1 << 3;
        /// Create, edit and delete minute trackers and their tasks
        const MANAGE_TRACKERS  = 1 << 4;
        /// Create, edit and delete users, audit their logins
        const MANAGE_USERS     = 1 << 5;
        /// Delete task history entries
        const DELETE_HISTORY   = 1 << 6;
        /// Export every collection
        const EXPORT_ALL       = 1 << 7;
        /// Bypass all capability checks
        const ADMINISTRATOR    = 1 << 8;

        /// Baseline for every signed-in user
        const BASE = Self::COMPLETE_TASKS.bits()
            | Self::CLOCK_ATTENDANCE.bits()
            | Self::EXPORT_OWN.bits();
    }
}

impl Capabilities {
    /// Compute capabilities for a role claim
    ///
    /// `access_level` only matters for staff.
    pub fn for_role(role: Role, access_level: AccessLevel) -> Self {
        match role {
            Role::Admin => Self::all(),
            Role::Staff => {
                let mut caps = Self::BASE | Self::MANAGE_TRACKERS;
                if access_level == AccessLevel::Elevated {
                    caps |= Self::MANAGE_TASKS | Self::DELETE_HISTORY;
                }
                caps
            }
            Role::Student => Self::BASE,
        }
    }

    /// Check a required capability, honouring ADMINISTRATOR
    #[inline]
    pub fn has(&self, capability: Capabilities) -> bool {
        if self.contains(Capabilities::ADMINISTRATOR) {
            return true;
        }
        self.contains(capability)
    }

    /// Names of the individual flags that are set
    pub fn list(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities::empty()
    }
}
