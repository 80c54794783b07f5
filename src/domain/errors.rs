//! Domain error types
//!
//! This module defines the error hierarchy for the checker. Every error is
//! fatal to a run: nothing here is retried or recovered locally. Errors carry
//! enough context (endpoint, identifier) to be reported on their own, and
//! none of them expose third-party HTTP client types.

use thiserror::Error;

/// Main checker error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum CheckerError {
    /// Bad CLI arguments, configuration file or delivery date
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure talking to LimsRest
    #[error("Request error: {0}")]
    Request(#[from] LimsRestError),

    /// Response body does not match the expected JSON shape
    #[error("Parse error for {endpoint}: {message}")]
    Parse { endpoint: String, message: String },

    /// LimsRest returned zero candidate manifests for a sample
    #[error("No sample manifest returned for sample {sample_id}")]
    EmptyResult { sample_id: String },

    /// LimsRest returned more than one candidate manifest under strict selection
    #[error("Expected one sample manifest for sample {sample_id}, got {candidates}")]
    AmbiguousResult { sample_id: String, candidates: usize },

    /// Run was cancelled by a shutdown signal
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// An enrichment task panicked or was aborted unexpectedly
    #[error("Task failure: {0}")]
    Task(String),

    /// Serialization errors while writing output
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// LimsRest transport errors
///
/// Each variant carries the endpoint that failed so the fatal report points
/// at the exact call.
#[derive(Debug, Error)]
pub enum LimsRestError {
    /// Could not reach the server or the connection dropped mid-response
    #[error("Failed to connect to LimsRest at {endpoint}: {message}")]
    Connection { endpoint: String, message: String },

    /// Credentials rejected (401/403)
    #[error("Authentication failed for {endpoint} (status {status})")]
    Authentication { endpoint: String, status: u16 },

    /// Request exceeded the configured timeout
    #[error("Request to {endpoint} timed out")]
    Timeout { endpoint: String },

    /// Any other non-success status
    #[error("LimsRest returned status {status} for {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
}

impl CheckerError {
    /// Builds a parse error for the given endpoint
    pub fn parse(endpoint: impl Into<String>, message: impl std::fmt::Display) -> Self {
        CheckerError::Parse {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error came from talking to LimsRest (as opposed to
    /// local configuration, cancellation or I/O)
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            CheckerError::Request(_)
                | CheckerError::Parse { .. }
                | CheckerError::EmptyResult { .. }
                | CheckerError::AmbiguousResult { .. }
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for CheckerError {
    fn from(err: std::io::Error) -> Self {
        CheckerError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CheckerError {
    fn from(err: serde_json::Error) -> Self {
        CheckerError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CheckerError {
    fn from(err: toml::de::Error) -> Self {
        CheckerError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<tokio::task::JoinError> for CheckerError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            CheckerError::Cancelled(format!("enrichment task aborted: {err}"))
        } else {
            CheckerError::Task(err.to_string())
        }
    }
}
