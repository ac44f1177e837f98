//! Unified application error types for AccountHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

use crate::types::readiness::FailureReason;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The referenced folder or account does not exist.
    NotFound,
    /// Input validation failed.
    Validation,
    /// A stored parent path is neither `/` nor a well-formed folder id.
    InvalidPathFormat,
    /// A parent chain is cyclic, dangling, or deeper than the configured guard.
    MalformedPathChain,
    /// The folder store failed to answer a lookup or mutation.
    StoreLookupFailed,
    /// The move destination is the folder itself or one of its descendants.
    IllegalMove,
    /// A campaign launch was rejected because the folder is not ready.
    NotReady(FailureReason),
    /// The request was cancelled or ran past its deadline.
    Cancelled,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::InvalidPathFormat => write!(f, "INVALID_PATH_FORMAT"),
            Self::MalformedPathChain => write!(f, "MALFORMED_PATH_CHAIN"),
            Self::StoreLookupFailed => write!(f, "STORE_LOOKUP_FAILED"),
            Self::IllegalMove => write!(f, "ILLEGAL_MOVE"),
            Self::NotReady(reason) => write!(f, "NOT_READY({})", reason.code()),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout AccountHub.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
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

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an invalid-path-format error.
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPathFormat, message)
    }

    /// Create a malformed-path-chain error.
    pub fn malformed_chain(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedPathChain, message)
    }

    /// Create a store failure error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreLookupFailed, message)
    }

    /// Create an illegal-move error.
    pub fn illegal_move(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalMove, message)
    }

    /// Create a not-ready error whose message is the reason's user message.
    pub fn not_ready(reason: FailureReason) -> Self {
        Self::new(ErrorKind::NotReady(reason), reason.user_message())
    }

    /// Create a cancellation error.
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Return the readiness reason if this is a `NotReady` error.
    pub fn readiness_reason(&self) -> Option<FailureReason> {
        match self.kind {
            ErrorKind::NotReady(reason) => Some(reason),
            _ => None,
        }
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

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
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

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::with_source(
            ErrorKind::StoreLookupFailed,
            format!("Database error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind() {
        let err = AppError::illegal_move("folder cannot contain itself");
        assert_eq!(err.to_string(), "ILLEGAL_MOVE: folder cannot contain itself");
    }

    #[test]
    fn test_not_ready_carries_reason() {
        let err = AppError::not_ready(FailureReason::MissingChat);
        assert_eq!(err.readiness_reason(), Some(FailureReason::MissingChat));
        assert_eq!(err.message, "First specify the chat");
        assert!(AppError::not_found("x").readiness_reason().is_none());
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::other("disk");
        let err = AppError::from(io);
        assert!(err.source.is_some());
        assert!(err.clone().source.is_none());
    }
}
