//! Error types for the shared crate
//!
//! Standardized error types used by the admin store, the persistence bridge,
//! the sync manager and order assembly.

use thiserror::Error;

/// Standard error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Validation error
    Validation,
    /// Resource not found
    NotFound,
    /// Persistence collaborator failure
    Persistence,
    /// Cross-context sync failure
    Sync,
    /// Invalid request / payload
    Invalid,
}

impl ErrorCode {
    /// Get the default message for this error
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::Validation => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::Persistence => "Persistence error",
            Self::Sync => "Sync channel error",
            Self::Invalid => "Invalid request",
        }
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation => "E0002",
            Self::NotFound => "E0003",
            Self::Invalid => "E0006",
            Self::Sync => "E7001",
            Self::Persistence => "E9002",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Unified error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Validation error
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Persistence collaborator error
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Sync channel error
    #[error("Sync error: {0}")]
    Sync(String),

    /// Invalid request / payload
    #[error("Invalid request: {0}")]
    Invalid(String),
}

impl AppError {
    // ========== Convenient constructors ==========

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    pub fn sync(message: impl Into<String>) -> Self {
        Self::Sync(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    // ========== Error inspection methods ==========

    /// Get the error code for this error
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::Validation,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Persistence(_) => ErrorCode::Persistence,
            Self::Sync(_) => ErrorCode::Sync,
            Self::Invalid(_) => ErrorCode::Invalid,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::Validation(m)
            | Self::NotFound(m)
            | Self::Persistence(m)
            | Self::Sync(m)
            | Self::Invalid(m) => m.clone(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::Invalid(format!("JSON error: {}", e))
    }
}

/// Application-level Result type
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::validation("x").error_code().code(), "E0002");
        assert_eq!(AppError::not_found("novel 9").error_code().code(), "E0003");
        assert_eq!(AppError::persistence("disk").error_code(), ErrorCode::Persistence);
        assert_eq!(AppError::sync("offline").message(), "offline");
    }

    #[test]
    fn test_json_errors_are_invalid_requests() {
        let err: AppError = serde_json::from_str::<u64>("nope").unwrap_err().into();
        assert_eq!(err.error_code(), ErrorCode::Invalid);
        assert_eq!(err.error_code().default_message(), "Invalid request");
    }
}
