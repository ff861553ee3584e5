//! Application configuration structs
//!
//! Loads configuration from a `.env` file and environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Duration;
use serde::Deserialize;
use teamdesk_core::engine::calendar::{offset_from_minutes, utc_offset};
use teamdesk_core::engine::{AttendancePolicy, PresencePolicy};
use teamdesk_core::UserId;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub heartbeat: HeartbeatConfig,
    pub presence: PresenceConfig,
    pub attendance: AttendanceConfig,
    pub export: ExportConfig,
    pub session: SessionConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

/// `lastActive` refresh cadence
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    pub interval_secs: u64,
}

impl HeartbeatConfig {
    #[must_use]
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.interval_secs)
    }
}

/// Online / inactive thresholds
#[derive(Debug, Clone)]
pub struct PresenceConfig {
    pub online_minutes: i64,
    pub inactive_days: i64,
}

impl PresenceConfig {
    #[must_use]
    pub fn policy(&self) -> PresencePolicy {
        PresencePolicy::new(
            Duration::minutes(self.online_minutes),
            Duration::days(self.inactive_days),
        )
    }
}

/// Lateness cutoff and the local offset used for hours and dates
#[derive(Debug, Clone)]
pub struct AttendanceConfig {
    pub late_hour: u32,
    pub utc_offset_minutes: i32,
}

impl AttendanceConfig {
    #[must_use]
    pub fn policy(&self) -> AttendancePolicy {
        let offset = offset_from_minutes(self.utc_offset_minutes).unwrap_or_else(utc_offset);
        AttendancePolicy::new(self.late_hour, offset)
    }
}

/// Export output location
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub dir: PathBuf,
}

/// Settings for the interactive session run by the binary
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub seed_file: Option<PathBuf>,
    pub acting_user_id: Option<String>,
}

impl SessionConfig {
    /// The user the session runs as
    pub fn acting_user(&self) -> Result<UserId, ConfigError> {
        let raw = self
            .acting_user_id
            .as_deref()
            .ok_or(ConfigError::MissingVar("ACTING_USER_ID"))?;
        UserId::parse(raw).map_err(|e| ConfigError::InvalidValue("ACTING_USER_ID", e.to_string()))
    }
}

// Default value functions
fn default_app_name() -> String {
    "teamdesk".to_string()
}

fn default_heartbeat_interval() -> u64 {
    60
}

fn default_online_minutes() -> i64 {
    5
}

fn default_inactive_days() -> i64 {
    5
}

fn default_late_hour() -> u32 {
    9
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("./exports")
}

/// Parse an optional variable, falling back to `default` when unset
fn parse_or<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(name, e.to_string())),
        None => Ok(default),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set to an unparseable value
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let heartbeat_interval: u64 =
            parse_or(&lookup, "HEARTBEAT_INTERVAL_SECS", default_heartbeat_interval())?;
        if heartbeat_interval == 0 {
            return Err(ConfigError::InvalidValue(
                "HEARTBEAT_INTERVAL_SECS",
                "must be greater than zero".to_string(),
            ));
        }

        let late_hour: u32 = parse_or(&lookup, "ATTENDANCE_LATE_HOUR", default_late_hour())?;
        if late_hour > 23 {
            return Err(ConfigError::InvalidValue(
                "ATTENDANCE_LATE_HOUR",
                format!("{late_hour} is not an hour of the day"),
            ));
        }

        let utc_offset_minutes: i32 = parse_or(&lookup, "LOCAL_UTC_OFFSET_MINUTES", 0)?;
        if offset_from_minutes(utc_offset_minutes).is_none() {
            return Err(ConfigError::InvalidValue(
                "LOCAL_UTC_OFFSET_MINUTES",
                format!("{utc_offset_minutes} is out of range"),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: parse_or(&lookup, "APP_ENV", Environment::default())?,
            },
            heartbeat: HeartbeatConfig {
                interval_secs: heartbeat_interval,
            },
            presence: PresenceConfig {
                online_minutes: parse_or(&lookup, "PRESENCE_ONLINE_MINUTES", default_online_minutes())?,
                inactive_days: parse_or(&lookup, "PRESENCE_INACTIVE_DAYS", default_inactive_days())?,
            },
            attendance: AttendanceConfig {
                late_hour,
                utc_offset_minutes,
            },
            export: ExportConfig {
                dir: lookup("EXPORT_DIR").map_or_else(default_export_dir, PathBuf::from),
            },
            session: SessionConfig {
                seed_file: lookup("SEED_FILE").map(PathBuf::from),
                acting_user_id: lookup("ACTING_USER_ID"),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
