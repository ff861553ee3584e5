//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, AttendanceConfig, ConfigError, Environment, ExportConfig,
    HeartbeatConfig, PresenceConfig, SessionConfig,
};
