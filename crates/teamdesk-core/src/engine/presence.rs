//! Presence classification from `lastActive`

use chrono::{DateTime, Duration, Utc};

use crate::entities::UserProfile;

pub const DEFAULT_ONLINE_MINUTES: i64 = 5;
pub const DEFAULT_INACTIVE_DAYS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresencePolicy {
    pub online_window: Duration,
    pub inactive_after: Duration,
}

impl Default for PresencePolicy {
    fn default() -> Self {
        Self {
            online_window: Duration::minutes(DEFAULT_ONLINE_MINUTES),
            inactive_after: Duration::days(DEFAULT_INACTIVE_DAYS),
        }
    }
}

impl PresencePolicy {
    pub fn new(online_window: Duration, inactive_after: Duration) -> Self {
        Self {
            online_window,
            inactive_after,
        }
    }

    /// Seen within the online window
    pub fn is_online(&self, last_active: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        last_active.is_some_and(|seen| now - seen < self.online_window)
    }

    /// Not seen for the inactivity period; never seen counts as the epoch
    pub fn is_inactive(&self, last_active: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        let seen = last_active.unwrap_or(DateTime::UNIX_EPOCH);
        now - seen >= self.inactive_after
    }

    pub fn online_members<'a>(&self, users: &'a [UserProfile], now: DateTime<Utc>) -> Vec<&'a UserProfile> {
        users
            .iter()
            .filter(|user| self.is_online(user.last_active, now))
            .collect()
    }

    pub fn inactive_members<'a>(&self, users: &'a [UserProfile], now: DateTime<Utc>) -> Vec<&'a UserProfile> {
        users
            .iter()
            .filter(|user| self.is_inactive(user.last_active, now))
            .collect()
    }
}
