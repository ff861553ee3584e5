//! Application error types
//!
//! Unified error handling for the entire application.

use serde::Serialize;
use std::fmt;
use teamdesk_core::DomainError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Access errors
    #[error("Not signed in")]
    NotSignedIn,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Resource errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Collaborator errors
    #[error("Store error: {0}")]
    Store(String),

    #[error("Identity provider error: {0}")]
    Identity(String),

    #[error("Export error: {0}")]
    Export(String),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// How an error should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The user can fix it (bad input, missing rights, stale view)
    User,
    /// A collaborator failed; retrying may help
    External,
    /// A defect or misconfiguration
    Internal,
}

impl AppError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotSignedIn
            | Self::InsufficientPermissions
            | Self::Validation(_)
            | Self::InvalidInput(_)
            | Self::NotFound(_)
            | Self::Conflict(_) => ErrorKind::User,

            Self::Store(_) | Self::Identity(_) | Self::Export(_) => ErrorKind::External,

            Self::Internal(_) | Self::Config(_) => ErrorKind::Internal,

            // Map domain errors by category
            Self::Domain(e) => {
                if e.is_not_found() || e.is_authorization() || e.is_validation() || e.is_conflict()
                {
                    ErrorKind::User
                } else if e.is_store_failure() {
                    ErrorKind::External
                } else {
                    ErrorKind::Internal
                }
            }
        }
    }

    /// Get error code for user-facing responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotSignedIn => "NOT_SIGNED_IN",
            Self::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Store(_) => "STORE_ERROR",
            Self::Identity(_) => "IDENTITY_ERROR",
            Self::Export(_) => "EXPORT_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Check if the user can act on this error
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        self.kind() == ErrorKind::User
    }

    /// Create a not found error for a resource type
    #[must_use]
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::NotFound(resource.to_string())
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Error shape shown to the user
#[derive(Debug, Serialize)]
pub struct UserFacingError {
    pub code: String,
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&AppError> for UserFacingError {
    fn from(err: &AppError) -> Self {
        let kind = err.kind();
        // internal details stay in the logs
        let message = if kind == ErrorKind::Internal {
            "Something went wrong. Please try again.".to_string()
        } else {
            err.to_string()
        };
        Self {
            code: err.error_code().to_string(),
            kind,
            message,
            details: None,
        }
    }
}

impl From<AppError> for UserFacingError {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
