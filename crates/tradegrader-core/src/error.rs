//! Error taxonomy shared by the engine and the grading service.
//!
//! Slot-scoped failures ([`SearchError`]) and draft-scoped failures
//! ([`ServiceError`]) are distinct types so that neither can be propagated
//! in place of the other.

use std::fmt;

use thiserror::Error;

/// Server-side domain error.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An upstream collaborator (LLM provider, scraper) failed.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

/// A failed or malformed player search, scoped to a single slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SearchError {
    /// Human-readable message shown inline next to the slot.
    pub message: String,
}

impl SearchError {
    /// Creates a search error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Classification of a grading-service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// The request never produced an HTTP response.
    Network,
    /// The service answered with a non-2xx status.
    Status(u16),
    /// The response body did not match the expected shape.
    Malformed,
    /// The client-side deadline elapsed.
    Timeout,
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Status(code) => write!(f, "status {code}"),
            Self::Malformed => write!(f, "malformed response"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

/// A failed or malformed grading response, scoped to the whole draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("grading service error ({kind}): {message}")]
pub struct ServiceError {
    /// What went wrong.
    pub kind: ServiceErrorKind,
    /// Human-readable message for the user-facing notification.
    pub message: String,
}

impl ServiceError {
    /// Creates a service error of the given kind.
    #[must_use]
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
