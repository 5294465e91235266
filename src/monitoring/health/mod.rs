//! Checkers
//!
//! A [`Checker`] evaluates one category of check. The built-in checkers cover
//! network endpoints ([`HttpChecker`]), data stores ([`DatabaseChecker`]) and
//! local resources ([`SystemChecker`]); custom categories are served by
//! user-supplied implementations registered in a [`CheckerRegistry`].

mod database;
mod error;
mod http;
mod system;


pub use database::DatabaseChecker;
pub use error::CheckerError;
pub use http::HttpChecker;
pub use system::{ResourceSampler, SysinfoSampler, SystemChecker};

use crate::config::{CheckConfig, CheckType};
use crate::monitoring::types::{HealthStatus, Metadata};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Fraction of the timeout above which a passing check is reported degraded
pub const DEGRADED_LATENCY_RATIO: f64 = 0.8;

/// Result of a single successful attempt
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub status: HealthStatus,
    pub message: Option<String>,
    pub metadata: Metadata,
}

impl CheckOutcome {
    pub fn new(status: HealthStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
            metadata: Metadata::new(),
        }
    }

    pub fn healthy(message: impl Into<String>) -> Self {
        Self::new(HealthStatus::Healthy, message)
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Self::new(HealthStatus::Degraded, message)
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::new(HealthStatus::Unhealthy, message)
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Evaluator for one check category
///
/// Implementations must finish within `timeout` and must release every
/// connection or socket they open on all exit paths.
#[async_trait]
pub trait Checker: Send + Sync {
    /// Category this checker serves
    fn check_type(&self) -> CheckType;

    /// Run one attempt against the check's target
    async fn evaluate(
        &self,
        config: &CheckConfig,
        timeout: Duration,
    ) -> Result<CheckOutcome, CheckerError>;
}

/// Healthy, or degraded when `elapsed` exceeds the latency budget
pub fn classify_latency(elapsed: Duration, timeout: Duration) -> HealthStatus {
    if elapsed.as_secs_f64() > timeout.as_secs_f64() * DEGRADED_LATENCY_RATIO {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}

/// Checker lookup by check type
#[derive(Clone, Default)]
pub struct CheckerRegistry {
    checkers: HashMap<CheckType, Arc<dyn Checker>>,
}

impl CheckerRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in HTTP, database and system checkers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(HttpChecker::new()));
        registry.register(Arc::new(DatabaseChecker::new()));
        registry.register(Arc::new(SystemChecker::new()));
        registry
    }

    /// Install a checker for its type, returning the one it replaces
    pub fn register(&mut self, checker: Arc<dyn Checker>) -> Option<Arc<dyn Checker>> {
        self.checkers.insert(checker.check_type(), checker)
    }

    pub fn get(&self, check_type: CheckType) -> Option<Arc<dyn Checker>> {
        self.checkers.get(&check_type).cloned()
    }

    /// Registered types, sorted
    pub fn types(&self) -> Vec<CheckType> {
        let mut types: Vec<_> = self.checkers.keys().copied().collect();
        types.sort();
        types
    }
}

impl fmt::Debug for CheckerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckerRegistry")
            .field("types", &self.types())
            .finish()
    }
}
