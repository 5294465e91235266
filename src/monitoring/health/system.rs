//! Local system resource checker
//!
//! Resource values are percentages: used memory of total memory, global CPU
//! usage, and used space of the filesystem that contains a given path.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use sysinfo::{Disks, System};

use super::{CheckOutcome, Checker, CheckerError, DEGRADED_LATENCY_RATIO};
use crate::config::{CheckConfig, CheckSpec, CheckType, ResourceCheck, ResourceKind};
use crate::monitoring::types::{HealthStatus, Metadata, round2};

/// Source of resource usage percentages
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceSampler: Send + Sync {
    async fn memory_usage(&self) -> Result<f64, CheckerError>;

    async fn cpu_usage(&self) -> Result<f64, CheckerError>;

    async fn disk_usage(&self, path: &str) -> Result<f64, CheckerError>;
}

/// [`ResourceSampler`] backed by the `sysinfo` crate
pub struct SysinfoSampler {
    system: Mutex<System>,
    disks: Mutex<Disks>,
}

impl SysinfoSampler {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
            disks: Mutex::new(Disks::new_with_refreshed_list()),
        }
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceSampler for SysinfoSampler {
    async fn memory_usage(&self) -> Result<f64, CheckerError> {
        let mut system = self.system.lock();
        system.refresh_memory();

        let total = system.total_memory();
        if total == 0 {
            return Err(CheckerError::Resource("total memory is unavailable".to_string()));
        }
        Ok(system.used_memory() as f64 / total as f64 * 100.0)
    }

    async fn cpu_usage(&self) -> Result<f64, CheckerError> {
        // Usage is a delta between two refreshes
        self.system.lock().refresh_cpu_usage();
        tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;

        let mut system = self.system.lock();
        system.refresh_cpu_usage();
        Ok(system.global_cpu_usage() as f64)
    }

    async fn disk_usage(&self, path: &str) -> Result<f64, CheckerError> {
        let mut disks = self.disks.lock();
        disks.refresh_list();

        let target = Path::new(path);
        let disk = disks
            .iter()
            .filter(|disk| target.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().components().count())
            .ok_or_else(|| CheckerError::Resource(format!("no mounted filesystem contains {}", path)))?;

        let total = disk.total_space();
        if total == 0 {
            return Err(CheckerError::Resource(format!(
                "filesystem at {} reports zero size",
                disk.mount_point().display()
            )));
        }
        let used = total.saturating_sub(disk.available_space());
        Ok(used as f64 / total as f64 * 100.0)
    }
}

/// Classify one sub-check: above the threshold is unhealthy, above 80% of it degraded
pub fn classify_resource(value: f64, threshold: f64) -> HealthStatus {
    if value > threshold {
        HealthStatus::Unhealthy
    } else if value > threshold * DEGRADED_LATENCY_RATIO {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}

/// Checker evaluating memory, CPU and disk sub-checks
///
/// The overall status is the worst sub-check status; every sub-check value is
/// reported in the outcome metadata.
#[derive(Clone)]
pub struct SystemChecker {
    sampler: Arc<dyn ResourceSampler>,
}

impl SystemChecker {
    pub fn new() -> Self {
        Self::with_sampler(Arc::new(SysinfoSampler::new()))
    }

    pub fn with_sampler(sampler: Arc<dyn ResourceSampler>) -> Self {
        Self { sampler }
    }

    async fn sample(&self, check: &ResourceCheck) -> Result<f64, CheckerError> {
        match check.resource {
            ResourceKind::Memory => self.sampler.memory_usage().await,
            ResourceKind::Cpu => self.sampler.cpu_usage().await,
            ResourceKind::Disk => self.sampler.disk_usage(check.path.as_deref().unwrap_or("/")).await,
        }
    }
}

impl Default for SystemChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Checker for SystemChecker {
    fn check_type(&self) -> CheckType {
        CheckType::System
    }

    async fn evaluate(
        &self,
        config: &CheckConfig,
        _timeout: Duration,
    ) -> Result<CheckOutcome, CheckerError> {
        let CheckSpec::System(spec) = &config.spec else {
            return Err(CheckerError::invalid_config(format!(
                "System checker cannot evaluate a {} check",
                config.check_type()
            )));
        };

        let mut overall = HealthStatus::Healthy;
        let mut metadata = Metadata::new();
        let mut breaches = Vec::new();

        for check in &spec.checks {
            let value = round2(self.sample(check).await?);
            let status = classify_resource(value, check.threshold);
            overall = overall.worst(status);

            let key = check.metadata_key();
            if status != HealthStatus::Healthy {
                breaches.push(format!(
                    "{} {} at {}% (threshold {}%)",
                    key, status, value, check.threshold
                ));
            }
            metadata.insert(
                key,
                json!({
                    "value": value,
                    "threshold": check.threshold,
                    "status": status,
                }),
            );
        }

        let message = if breaches.is_empty() {
            format!("{} resource checks within thresholds", spec.checks.len())
        } else {
            breaches.join(", ")
        };

        Ok(CheckOutcome {
            status: overall,
            message: Some(message),
            metadata,
        })
    }
}
