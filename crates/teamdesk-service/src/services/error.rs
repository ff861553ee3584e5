//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use std::fmt;

use teamdesk_common::{AppError, ErrorKind};
use teamdesk_core::{DomainError, RepoResult};
use validator::ValidationErrors;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation or collaborator failure
    Domain(DomainError),

    /// Application error (sign-in, configuration, etc.)
    App(AppError),

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// The acting user lacks a capability
    PermissionDenied { capability: String },

    /// Validation error
    Validation(String),

    /// Conflict (e.g., already clocked in)
    Conflict(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::PermissionDenied { capability } => {
                write!(f, "Missing required capability: {capability}")
            }
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a not found error
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(capability: impl Into<String>) -> Self {
        Self::PermissionDenied {
            capability: capability.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// How the error should be presented
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(e) => {
                if e.is_store_failure() {
                    ErrorKind::External
                } else if matches!(e, DomainError::InternalError(_)) {
                    ErrorKind::Internal
                } else {
                    ErrorKind::User
                }
            }
            Self::App(e) => e.kind(),
            Self::NotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::Validation(_)
            | Self::Conflict(_) => ErrorKind::User,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether the operation was refused before touching the store
    pub fn is_authorization(&self) -> bool {
        match self {
            Self::PermissionDenied { .. } => true,
            Self::Domain(e) => e.is_authorization(),
            Self::App(e) => matches!(e, AppError::InsufficientPermissions),
            _ => false,
        }
    }

    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::Domain(e) => e.is_validation(),
            Self::App(e) => matches!(e, AppError::Validation(_) | AppError::InvalidInput(_)),
            _ => false,
        }
    }

    /// Whether a collaborator rejected the write
    pub fn is_store_failure(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_store_failure(),
            Self::App(e) => matches!(e, AppError::Store(_) | AppError::Identity(_)),
            _ => false,
        }
    }

    /// Get the error code for user-facing messages
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::PermissionDenied { .. } => "MISSING_CAPABILITY",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect();
        messages.sort();
        Self::Validation(messages.join("; "))
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::NotFound { resource, id } => {
                AppError::NotFound(format!("{resource} {id}"))
            }
            ServiceError::PermissionDenied { capability: _ } => AppError::InsufficientPermissions,
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Conflict(msg) => AppError::Conflict(msg),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Store writes whose target may have vanished since the last snapshot
pub(crate) trait StaleWrite {
    /// `Ok(false)` when the target no longer exists
    fn or_stale(self) -> ServiceResult<bool>;
}

impl StaleWrite for RepoResult<()> {
    fn or_stale(self) -> ServiceResult<bool> {
        match self {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
