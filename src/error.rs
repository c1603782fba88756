//! Error handling for the people directory service
//!
//! This module provides idiomatic Rust error types using thiserror, split
//! along the fault lines the service cares about: caller mistakes, failures
//! of the external classification services, and storage failures.

use thiserror::Error;

/// Main error type for directory operations
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("enrichment error: {0}")]
    Enrichment(#[from] EnrichmentError),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Caller-side input errors, rejected before any lookup or storage call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("limit must be between 1 and {max}, got {got}")]
    LimitOutOfRange { got: i64, max: i64 },

    #[error("cursor must be non-negative, got {got}")]
    NegativeCursor { got: i64 },

    #[error("age must be non-negative, got {got}")]
    NegativeAge { got: i32 },
}

/// Failures of the external classification services
///
/// The creation flow treats every variant the same way: the whole enrichment
/// is aborted and nothing is persisted. The variants exist so logs and
/// callers can tell a dead service from a service that answered garbage.
#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("{service} lookup timed out")]
    Timeout { service: &'static str },

    #[error("{service} lookup failed: {message}")]
    Unavailable {
        service: &'static str,
        message: String,
    },

    #[error("{service} returned a malformed response: {message}")]
    MalformedResponse {
        service: &'static str,
        message: String,
    },
}

impl EnrichmentError {
    /// Name of the classification service that produced this error
    pub fn service(&self) -> &'static str {
        match self {
            Self::Timeout { service }
            | Self::Unavailable { service, .. }
            | Self::MalformedResponse { service, .. } => service,
        }
    }
}

/// Result type alias for directory operations
pub type DirectoryResult<T> = Result<T, DirectoryError>;
