//! Type definitions for evaluation results, metrics and summaries

use crate::config::CheckType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Free-form, checker-specific result metadata
pub type Metadata = HashMap<String, serde_json::Value>;

/// Health status of a single check or of a whole batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
    Unknown,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
            HealthStatus::Unknown => "unknown",
        }
    }

    /// Healthy and degraded executions count as successful
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, HealthStatus::Healthy | HealthStatus::Degraded)
    }

    /// Transport status code: `unhealthy → 503`, `degraded → 206`, else `200`
    pub fn http_status_code(&self) -> u16 {
        match self {
            HealthStatus::Unhealthy => 503,
            HealthStatus::Degraded => 206,
            HealthStatus::Healthy | HealthStatus::Unknown => 200,
        }
    }

    /// Ordering used to pick the worst of several statuses
    pub(crate) fn severity(&self) -> u8 {
        match self {
            HealthStatus::Healthy => 0,
            HealthStatus::Unknown => 1,
            HealthStatus::Degraded => 2,
            HealthStatus::Unhealthy => 3,
        }
    }

    /// The more severe of two statuses
    pub fn worst(self, other: Self) -> Self {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one end-to-end evaluation of a check, retries included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub check_type: CheckType,
    pub status: HealthStatus,
    /// Evaluation start time
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Wall-clock milliseconds for the whole attempt sequence
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: Metadata,
    /// Attempts consumed beyond the first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<u32>,
}

impl EvaluationResult {
    /// Result standing in for an execution that could not run to completion
    pub fn failed(
        id: impl Into<String>,
        name: impl Into<String>,
        check_type: CheckType,
        error: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            check_type,
            status: HealthStatus::Unhealthy,
            timestamp: chrono::Utc::now(),
            duration: 0,
            message: None,
            error: Some(error.into()),
            metadata: Metadata::new(),
            retry_count: None,
        }
    }
}

/// Running statistics for one check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckMetrics {
    pub total_executions: u64,
    /// Healthy or degraded executions
    pub successful_executions: u64,
    pub failed_executions: u64,
    /// Running mean of result durations in milliseconds
    pub average_response_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_execution_time: Option<chrono::DateTime<chrono::Utc>>,
    /// Successful executions as a percentage of all executions
    pub uptime: f64,
}

impl Default for CheckMetrics {
    fn default() -> Self {
        Self {
            total_executions: 0,
            successful_executions: 0,
            failed_executions: 0,
            average_response_time: 0.0,
            last_execution_time: None,
            uptime: 100.0,
        }
    }
}

/// Aggregated health across one batch execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSummary {
    pub status: HealthStatus,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub total: usize,
    pub healthy: usize,
    pub degraded: usize,
    pub unhealthy: usize,
    pub unknown: usize,
    pub results: Vec<EvaluationResult>,
}

impl HealthSummary {
    /// Build a summary from the results of one batch
    pub fn from_results(results: Vec<EvaluationResult>) -> Self {
        let count = |status: HealthStatus| results.iter().filter(|r| r.status == status).count();

        let healthy = count(HealthStatus::Healthy);
        let degraded = count(HealthStatus::Degraded);
        let unhealthy = count(HealthStatus::Unhealthy);
        let unknown = count(HealthStatus::Unknown);

        Self {
            status: overall_status(healthy, degraded, unhealthy, unknown),
            timestamp: chrono::Utc::now(),
            total: results.len(),
            healthy,
            degraded,
            unhealthy,
            unknown,
            results,
        }
    }

    /// Pretty-printed JSON body for the summary
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Batch status precedence.
///
/// Unknown only wins when nothing reported healthy, so `{healthy, unknown}`
/// is healthy while `{degraded, unknown}` is degraded.
pub fn overall_status(
    healthy: usize,
    degraded: usize,
    unhealthy: usize,
    unknown: usize,
) -> HealthStatus {
    if unhealthy > 0 {
        HealthStatus::Unhealthy
    } else if degraded > 0 {
        HealthStatus::Degraded
    } else if unknown > 0 && healthy == 0 {
        HealthStatus::Unknown
    } else {
        HealthStatus::Healthy
    }
}

/// Per-call overrides of a check's execution parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionOptions {
    pub timeout: Option<Duration>,
    pub retries: Option<u32>,
    pub retry_delay: Option<Duration>,
}

impl ExecutionOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = Some(retry_delay);
        self
    }
}

/// Round to two decimal places
#[inline]
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
