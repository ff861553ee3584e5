//! # teamdesk-service
//!
//! Application layer containing user actions, DTOs, dashboard sessions
//! and the presence heartbeat.

pub mod dto;
pub mod services;

pub use services::{
    spawn_heartbeat, Actor, AttendanceService, DashboardSession, ExportService, InsightService,
    LoginHistoryService, MemberService, PermissionService, PresenceService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, TaskService, TrackerService,
};
