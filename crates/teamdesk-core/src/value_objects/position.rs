//! Team position - free text with a few recognized titles

use serde::{Deserialize, Serialize};
use std::fmt;

/// Badge shown next to a member's name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PositionBadge {
    Leader,
    CoLeader,
    Staff,
    Default,
}

/// A member's position inside the team
///
/// Stored as an arbitrary string. Unknown titles are kept verbatim and get
/// the default badge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(String);

impl Position {
    pub const LEADER: &'static str = "Leader";
    pub const CO_LEADER: &'static str = "Co-Leader";
    pub const MEMBER: &'static str = "Member";
    pub const STAFF: &'static str = "Staff";

    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    pub fn member() -> Self {
        Self(Self::MEMBER.to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn badge(&self) -> PositionBadge {
        match self.0.as_str() {
            Self::LEADER => PositionBadge::Leader,
            Self::CO_LEADER => PositionBadge::CoLeader,
            Self::STAFF => PositionBadge::Staff,
            _ => PositionBadge::Default,
        }
    }

    /// Rank used to list leaders first
    pub fn rank(&self) -> u8 {
        match self.badge() {
            PositionBadge::Leader => 0,
            PositionBadge::CoLeader => 1,
            PositionBadge::Staff => 2,
            PositionBadge::Default => 3,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::member()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Position {
    fn from(title: &str) -> Self {
        Self::new(title)
    }
}
