//! Per-check running statistics

use dashmap::DashMap;
use std::collections::HashMap;

use super::types::{CheckMetrics, EvaluationResult, round2};

/// Running execution statistics keyed by check id
#[derive(Debug, Default)]
pub struct MetricsAggregator {
    metrics: DashMap<String, CheckMetrics>,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize metrics for an id; existing metrics are kept
    pub fn create(&self, id: &str) {
        self.metrics.entry(id.to_string()).or_default();
    }

    pub fn remove(&self, id: &str) -> bool {
        self.metrics.remove(id).is_some()
    }

    /// Fold one result into the id's statistics.
    ///
    /// Returns `false` when the id is not tracked and the result was dropped.
    pub fn record(&self, id: &str, result: &EvaluationResult) -> bool {
        let Some(mut metrics) = self.metrics.get_mut(id) else {
            return false;
        };

        metrics.total_executions += 1;
        if result.status.is_success() {
            metrics.successful_executions += 1;
        } else {
            metrics.failed_executions += 1;
        }

        let n = metrics.total_executions as f64;
        metrics.average_response_time =
            round2((metrics.average_response_time * (n - 1.0) + result.duration as f64) / n);
        metrics.uptime = round2(metrics.successful_executions as f64 / n * 100.0);
        metrics.last_execution_time = Some(result.timestamp);

        true
    }

    pub fn get(&self, id: &str) -> Option<CheckMetrics> {
        self.metrics.get(id).map(|metrics| metrics.clone())
    }

    pub fn all(&self) -> HashMap<String, CheckMetrics> {
        self.metrics
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.metrics.contains_key(id)
    }
}
