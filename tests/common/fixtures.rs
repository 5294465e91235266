//! Test fixtures and data factories
//!
//! Provides factory methods for creating check configurations with sensible
//! defaults, and a custom checker scripted through check params.

use async_trait::async_trait;
use healthwatch::{
    CheckConfig, CheckOutcome, CheckSpec, CheckType, Checker, CheckerError, CustomCheckSpec,
    DatabaseCheckSpec, HealthStatus, HttpCheckSpec, ResourceCheck, SystemCheckSpec,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Factory for check configurations
pub struct CheckFactory;

impl CheckFactory {
    /// HTTP check expecting `200` from `url`
    pub fn http(id: &str, url: impl Into<String>) -> CheckConfig {
        CheckConfig::new(id, format!("HTTP {}", id), CheckSpec::Http(HttpCheckSpec::new(url)))
            .with_retry_delay(10)
    }

    /// Database check running the default liveness query
    pub fn database(id: &str, connection_string: &str) -> CheckConfig {
        CheckConfig::new(
            id,
            format!("Database {}", id),
            CheckSpec::Database(DatabaseCheckSpec::new(connection_string)),
        )
        .with_retry_delay(10)
    }

    pub fn system(id: &str, checks: Vec<ResourceCheck>) -> CheckConfig {
        CheckConfig::new(
            id,
            format!("System {}", id),
            CheckSpec::System(SystemCheckSpec { checks }),
        )
    }

    /// Custom check; see [`ScriptedChecker`] for the recognized params
    pub fn custom(id: &str, params: Value) -> CheckConfig {
        let params = match params {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        CheckConfig::new(
            id,
            format!("Custom {}", id),
            CheckSpec::Custom(CustomCheckSpec { params }),
        )
        .with_retry_delay(1)
    }
}

/// Custom checker driven by check params
///
/// - `status`: status reported on success (default `healthy`)
/// - `failures`: number of leading attempts, per check id, that fail
/// - `delayMs`: time spent per attempt
#[derive(Default)]
pub struct ScriptedChecker {
    attempts: Mutex<HashMap<String, u64>>,
}

impl ScriptedChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts made so far for a check id
    pub fn attempts(&self, id: &str) -> u64 {
        self.attempts.lock().get(id).copied().unwrap_or(0)
    }
}

#[async_trait]
impl Checker for ScriptedChecker {
    fn check_type(&self) -> CheckType {
        CheckType::Custom
    }

    async fn evaluate(
        &self,
        config: &CheckConfig,
        _timeout: Duration,
    ) -> Result<CheckOutcome, CheckerError> {
        let CheckSpec::Custom(spec) = &config.spec else {
            return Err(CheckerError::invalid_config("not a custom check"));
        };

        let attempt = {
            let mut attempts = self.attempts.lock();
            let counter = attempts.entry(config.id.clone()).or_insert(0);
            *counter += 1;
            *counter
        };

        if let Some(delay) = spec.params.get("delayMs").and_then(Value::as_u64) {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let failures = spec.params.get("failures").and_then(Value::as_u64).unwrap_or(0);
        if attempt <= failures {
            return Err(CheckerError::other(format!("scripted failure {}", attempt)));
        }

        let status = match spec.params.get("status").and_then(Value::as_str) {
            Some("degraded") => HealthStatus::Degraded,
            Some("unhealthy") => HealthStatus::Unhealthy,
            Some("unknown") => HealthStatus::Unknown,
            _ => HealthStatus::Healthy,
        };
        Ok(CheckOutcome::new(status, format!("attempt {}", attempt)))
    }
}
