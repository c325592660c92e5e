//! Custom error types for signin-audit
//!
//! This module defines the error hierarchy for the reporter using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for signin-audit operations
#[derive(Error, Debug)]
pub enum AuditError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input (dates, filters, flags)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing, expired, or under-privileged access token
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),

    /// A page request failed
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Graph answered with a non-success status
    #[error("Graph request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl AuditError {
    /// Check if this error came from authentication
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Check if this error aborted the fetch
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Api { .. })
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) => 2,
            Self::Auth(_) => 3,
            Self::Client(_) | Self::Fetch(_) | Self::Api { .. } => 4,
            Self::Io(_) | Self::Json(_) | Self::Export(_) => 5,
        }
    }
}

impl From<std::io::Error> for AuditError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for AuditError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for signin-audit operations
pub type AuditResult<T> = Result<T, AuditError>;
