//! Unified application error types for VoteHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The four recoverable conditions a
//! voting client surfaces to its user are [`ErrorKind::WriteFailed`],
//! [`ErrorKind::Validation`], [`ErrorKind::RateLimit`] and
//! [`ErrorKind::UnknownCategory`].

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A write to the shared store did not complete.
    WriteFailed,
    /// Input failed the sanitization rules.
    Validation,
    /// The caller exceeded its action quota.
    RateLimit,
    /// A submission targeted a category that is not in the catalog.
    UnknownCategory,
    /// The requested record was not found.
    NotFound,
    /// The caller may not modify the record.
    Forbidden,
    /// A payload read from the store did not have the expected shape.
    MalformedPayload,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// The remote store could not be reached or answered unexpectedly.
    ExternalService,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "WRITE_FAILED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::UnknownCategory => write!(f, "UNKNOWN_CATEGORY"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::MalformedPayload => write!(f, "MALFORMED_PAYLOAD"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::ExternalService => write!(f, "EXTERNAL_SERVICE"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout VoteHub.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a write-failed error.
    pub fn write_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::WriteFailed, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a rate-limit error.
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RateLimit, message)
    }

    /// Create an unknown-category error for the given category id.
    pub fn unknown_category(category_id: &str) -> Self {
        Self::new(
            ErrorKind::UnknownCategory,
            format!("Unknown category: '{category_id}'"),
        )
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a malformed-payload error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedPayload, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an external-service error.
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether the caller can recover by retrying or correcting the user action.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::WriteFailed
                | ErrorKind::Validation
                | ErrorKind::RateLimit
                | ErrorKind::UnknownCategory
                | ErrorKind::NotFound
                | ErrorKind::Forbidden
        )
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = AppError::unknown_category("sports");
        assert_eq!(err.to_string(), "UNKNOWN_CATEGORY: Unknown category: 'sports'");
    }

    #[test]
    fn test_recoverable_kinds() {
        assert!(AppError::write_failed("offline").is_recoverable());
        assert!(AppError::rate_limit("slow down").is_recoverable());
        assert!(!AppError::configuration("bad backend").is_recoverable());
    }

    #[test]
    fn test_clone_drops_source() {
        let json_err = serde_json::from_str::<u8>("x").unwrap_err();
        let err = AppError::from(json_err);
        assert!(err.source.is_some());
        let cloned = err.clone();
        assert_eq!(cloned.kind, ErrorKind::Serialization);
        assert!(cloned.source.is_none());
    }
}
