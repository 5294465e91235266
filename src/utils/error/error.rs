//! Error types for the health-check engine

use thiserror::Error;

/// Result type alias for the engine
pub type Result<T> = std::result::Result<T, HealthError>;

/// Main error type for orchestrator operations and configuration loading
///
/// Failures raised by a checker while evaluating a target never surface here:
/// the execution controller turns them into an unhealthy result instead.
#[derive(Error, Debug)]
pub enum HealthError {
    /// Unknown check id
    #[error("Check not found: {0}")]
    NotFound(String),

    /// A check with this id is already registered
    #[error("Check already exists: {0}")]
    DuplicateId(String),

    /// No checker is registered for the check's type
    #[error("Unsupported check type: {0}")]
    UnsupportedType(String),

    /// Check or engine configuration failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal errors, e.g. a spawned execution task that did not finish
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HealthError {
    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Self::NotFound(id.into())
    }

    pub fn duplicate_id<S: Into<String>>(id: S) -> Self {
        Self::DuplicateId(id.into())
    }

    pub fn unsupported_type<S: Into<String>>(check_type: S) -> Self {
        Self::UnsupportedType(check_type.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Transport status code an HTTP layer should answer with for this error
    pub fn status_code(&self) -> u16 {
        match self {
            HealthError::NotFound(_) => 404,
            HealthError::DuplicateId(_) => 409,
            HealthError::Validation(_) | HealthError::UnsupportedType(_) => 400,
            _ => 500,
        }
    }

    /// Stable machine-readable code for this error kind
    pub fn error_code(&self) -> &'static str {
        match self {
            HealthError::NotFound(_) => "NOT_FOUND",
            HealthError::DuplicateId(_) => "CONFLICT",
            HealthError::UnsupportedType(_) => "UNSUPPORTED_TYPE",
            HealthError::Validation(_) => "VALIDATION_ERROR",
            HealthError::Config(_) => "CONFIG_ERROR",
            HealthError::Io(_) => "IO_ERROR",
            HealthError::Yaml(_) | HealthError::Serialization(_) => "SERIALIZATION_ERROR",
            HealthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Standard error body for transports that expose engine errors
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}

impl From<&HealthError> for ErrorResponse {
    fn from(error: &HealthError) -> Self {
        Self {
            error: ErrorDetail {
                code: error.error_code().to_string(),
                message: error.to_string(),
                timestamp: chrono::Utc::now().timestamp(),
            },
        }
    }
}
