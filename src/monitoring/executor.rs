//! Timeout and retry policy around a single checker invocation

use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::health::{CheckOutcome, Checker, CheckerError};
use super::types::{EvaluationResult, ExecutionOptions, HealthStatus};
use crate::config::{CheckConfig, EngineConfig};

/// Effective execution parameters for one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub timeout: Duration,
    pub retries: u32,
    pub retry_delay: Duration,
}

/// Runs a checker with per-attempt timeouts and retry-with-delay
///
/// Checker failures never escape: an exhausted attempt sequence becomes an
/// unhealthy [`EvaluationResult`] carrying the last error.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    defaults: EngineConfig,
}

impl Executor {
    pub fn new(defaults: EngineConfig) -> Self {
        Self { defaults }
    }

    /// Per-call options win over the check's values, which win over engine defaults
    pub fn plan(&self, config: &CheckConfig, options: &ExecutionOptions) -> ExecutionPlan {
        ExecutionPlan {
            timeout: options
                .timeout
                .or_else(|| config.timeout.map(Duration::from_millis))
                .unwrap_or_else(|| self.defaults.default_timeout()),
            retries: options
                .retries
                .or(config.retries)
                .unwrap_or(self.defaults.default_retries),
            retry_delay: options
                .retry_delay
                .or_else(|| config.retry_delay.map(Duration::from_millis))
                .unwrap_or_else(|| self.defaults.default_retry_delay()),
        }
    }

    pub async fn execute(
        &self,
        checker: &dyn Checker,
        config: &CheckConfig,
        options: &ExecutionOptions,
    ) -> EvaluationResult {
        let plan = self.plan(config, options);
        let timestamp = chrono::Utc::now();
        let start = Instant::now();
        let mut last_error = None;
        let attempts = plan.retries.saturating_add(1);

        for attempt in 0..=plan.retries {
            match Self::attempt(checker, config, plan.timeout).await {
                Ok(outcome) => {
                    debug!(
                        "Check {} succeeded on attempt {} with status {}",
                        config.id,
                        attempt.saturating_add(1),
                        outcome.status
                    );
                    return EvaluationResult {
                        id: config.id.clone(),
                        name: config.name.clone(),
                        check_type: config.check_type(),
                        status: outcome.status,
                        timestamp,
                        duration: start.elapsed().as_millis() as u64,
                        message: outcome.message,
                        error: None,
                        metadata: outcome.metadata,
                        retry_count: Some(attempt),
                    };
                }
                Err(e) => {
                    warn!(
                        "Check {} attempt {}/{} failed: {}",
                        config.id,
                        attempt.saturating_add(1),
                        attempts,
                        e
                    );
                    last_error = Some(e.to_string());
                    if attempt < plan.retries {
                        tokio::time::sleep(plan.retry_delay).await;
                    }
                }
            }
        }

        EvaluationResult {
            id: config.id.clone(),
            name: config.name.clone(),
            check_type: config.check_type(),
            status: HealthStatus::Unhealthy,
            timestamp,
            duration: start.elapsed().as_millis() as u64,
            message: None,
            error: last_error,
            metadata: Default::default(),
            retry_count: Some(plan.retries),
        }
    }

    async fn attempt(
        checker: &dyn Checker,
        config: &CheckConfig,
        timeout: Duration,
    ) -> Result<CheckOutcome, CheckerError> {
        tokio::time::timeout(timeout, checker.evaluate(config, timeout))
            .await
            .map_err(|_| CheckerError::Timeout(timeout))?
    }
}
