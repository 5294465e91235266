//! Structured events emitted after executions

use tracing::{info, warn};

use super::types::{EvaluationResult, HealthStatus, HealthSummary};

/// Receiver of execution events
///
/// Called after every single-check execution and every batch execution.
pub trait HealthEventSink: Send + Sync {
    fn on_result(&self, result: &EvaluationResult);

    fn on_summary(&self, summary: &HealthSummary);
}

/// [`HealthEventSink`] forwarding events to `tracing`
///
/// Healthy and degraded outcomes are emitted at `info`, everything else at
/// `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl HealthEventSink for TracingEventSink {
    fn on_result(&self, result: &EvaluationResult) {
        let retry_count = result.retry_count.unwrap_or(0);
        if result.status.is_success() {
            info!(
                check_id = %result.id,
                check_type = %result.check_type,
                status = %result.status,
                duration_ms = result.duration,
                retry_count,
                "health check executed"
            );
        } else {
            warn!(
                check_id = %result.id,
                check_type = %result.check_type,
                status = %result.status,
                duration_ms = result.duration,
                retry_count,
                error = result.error.as_deref().unwrap_or(""),
                "health check executed"
            );
        }
    }

    fn on_summary(&self, summary: &HealthSummary) {
        match summary.status {
            HealthStatus::Healthy | HealthStatus::Degraded => info!(
                status = %summary.status,
                total = summary.total,
                healthy = summary.healthy,
                degraded = summary.degraded,
                unhealthy = summary.unhealthy,
                unknown = summary.unknown,
                "health checks executed"
            ),
            HealthStatus::Unhealthy | HealthStatus::Unknown => warn!(
                status = %summary.status,
                total = summary.total,
                healthy = summary.healthy,
                degraded = summary.degraded,
                unhealthy = summary.unhealthy,
                unknown = summary.unknown,
                "health checks executed"
            ),
        }
    }
}
