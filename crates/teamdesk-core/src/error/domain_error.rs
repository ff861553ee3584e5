//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{DocumentId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Task not found: {0}")]
    TaskNotFound(DocumentId),

    #[error("Minute tracker not found: {0}")]
    TrackerNotFound(DocumentId),

    #[error("Tracker task not found: {0}")]
    TrackerTaskNotFound(DocumentId),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Record not found in {collection}: {id}")]
    RecordNotFound { collection: &'static str, id: String },

    #[error("No signed-in user")]
    NotSignedIn,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("Minutes must be greater than zero")]
    NonPositiveMinutes,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Missing capability: {0}")]
    MissingCapability(String),

    #[error("Email address must be verified first")]
    EmailNotVerified,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Already clocked in today")]
    AlreadyClockedIn,

    #[error("Already clocked out today")]
    AlreadyClockedOut,

    #[error("Not clocked in today")]
    NotClockedIn,

    #[error("Email already in use")]
    EmailAlreadyExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Identity provider error: {0}")]
    IdentityError(String),

    #[error("Export error: {0}")]
    ExportError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for user-facing responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::TaskNotFound(_) => "UNKNOWN_TASK",
            Self::TrackerNotFound(_) => "UNKNOWN_TRACKER",
            Self::TrackerTaskNotFound(_) => "UNKNOWN_TRACKER_TASK",
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::RecordNotFound { .. } => "UNKNOWN_RECORD",
            Self::NotSignedIn => "NOT_SIGNED_IN",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::EmptyField { .. } => "EMPTY_FIELD",
            Self::NonPositiveMinutes => "NON_POSITIVE_MINUTES",

            // Authorization
            Self::MissingCapability(_) => "MISSING_CAPABILITY",
            Self::EmailNotVerified => "EMAIL_NOT_VERIFIED",

            // Conflict
            Self::AlreadyClockedIn => "ALREADY_CLOCKED_IN",
            Self::AlreadyClockedOut => "ALREADY_CLOCKED_OUT",
            Self::NotClockedIn => "NOT_CLOCKED_IN",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",

            // Infrastructure
            Self::StoreError(_) => "STORE_ERROR",
            Self::IdentityError(_) => "IDENTITY_ERROR",
            Self::ExportError(_) => "EXPORT_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TaskNotFound(_)
                | Self::TrackerNotFound(_)
                | Self::TrackerTaskNotFound(_)
                | Self::UserNotFound(_)
                | Self::RecordNotFound { .. }
                | Self::NotSignedIn
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::EmptyField { .. }
                | Self::NonPositiveMinutes
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::MissingCapability(_) | Self::EmailNotVerified)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyClockedIn
                | Self::AlreadyClockedOut
                | Self::NotClockedIn
                | Self::EmailAlreadyExists
        )
    }

    /// Check if an external collaborator rejected the operation
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            Self::StoreError(_) | Self::IdentityError(_) | Self::ExportError(_)
        )
    }
}
