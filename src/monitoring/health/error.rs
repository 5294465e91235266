//! Checker error types

use std::time::Duration;
use thiserror::Error;

/// Failure raised by a checker while evaluating its target
///
/// These never reach orchestrator callers: the execution controller retries
/// them and finally reports an unhealthy result carrying the message.
#[derive(Error, Debug)]
pub enum CheckerError {
    /// The attempt did not finish within the effective timeout
    #[error("Check timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Transport-level HTTP failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response status outside the expected set
    #[error("Unexpected status code {actual}, expected one of {expected:?}")]
    UnexpectedStatus { actual: u16, expected: Vec<u16> },

    /// Response body did not satisfy the matcher
    #[error("Response body does not match: {0}")]
    BodyMismatch(String),

    /// Connection or query failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// First row differs from the expected value
    #[error("Query result mismatch: expected {expected}, got {actual}")]
    ResultMismatch { expected: String, actual: String },

    /// Resource sampling failure
    #[error("Resource check failed: {0}")]
    Resource(String),

    /// The check's payload cannot be evaluated by this checker
    #[error("Invalid check configuration: {0}")]
    InvalidConfig(String),

    /// Failure reported by a custom checker
    #[error("{0}")]
    Other(String),
}

impl CheckerError {
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other(message.into())
    }

    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig(message.into())
    }
}
