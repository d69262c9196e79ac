//! Error types for the research core.
//!
//! Errors fall into a few families that callers treat differently:
//! configuration and validation problems are reported before any I/O,
//! transient fetch failures are absorbed by the source adapters, and
//! authentication, rate-limit and storage faults always propagate.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the research core.
#[derive(Debug, Error)]
pub enum ResearchError {
    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        /// Optional cause description
        cause: Option<String>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("{service} API returned {status}")]
    ApiStatus { service: String, status: u16 },

    #[error("Authentication failed for {service}: {message}")]
    Auth { service: String, message: String },

    #[error("Rate limited by {service}, retry after {retry_after_secs:?} seconds")]
    RateLimited {
        service: String,
        retry_after_secs: Option<u64>,
    },

    // Database errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Configuration errors
    #[error("{name} not configured")]
    MissingCredential { name: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // Validation errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for research operations.
pub type Result<T> = std::result::Result<T, ResearchError>;

impl From<std::io::Error> for ResearchError {
    fn from(err: std::io::Error) -> Self {
        ResearchError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for ResearchError {
    fn from(err: serde_json::Error) -> Self {
        ResearchError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<rusqlite::Error> for ResearchError {
    fn from(err: rusqlite::Error) -> Self {
        ResearchError::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for ResearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ResearchError::Timeout(crate::config::NetworkConfig::REQUEST_TIMEOUT)
        } else {
            ResearchError::Network {
                message: err.to_string(),
                cause: err.url().map(|u| u.to_string()),
            }
        }
    }
}

impl ResearchError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        ResearchError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Shorthand for a validation failure on a named input.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ResearchError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether a fetch failure should degrade to an empty page.
    ///
    /// Transport failures, timeouts, non-success statuses and unreadable
    /// bodies are transient. Auth and rate-limit errors are not: they abort
    /// the whole call.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ResearchError::Network { .. }
                | ResearchError::Timeout(_)
                | ResearchError::ApiStatus { .. }
                | ResearchError::Json { .. }
        )
    }
}
