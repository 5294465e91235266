//! Health orchestrator
//!
//! The single entry point of the engine: owns the check registry, the
//! scheduler, the checkers and the result and metrics stores.

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::aggregator::MetricsAggregator;
use super::events::{HealthEventSink, TracingEventSink};
use super::executor::Executor;
use super::health::{Checker, CheckerRegistry};
use super::scheduler::{Scheduler, TickFn};
use super::store::ResultStore;
use super::types::{CheckMetrics, EvaluationResult, ExecutionOptions, HealthSummary};
use crate::config::{CheckConfig, CheckType, EngineConfig, Validate};
use crate::utils::error::{HealthError, Result};

/// State shared between the orchestrator and its spawned tasks
struct OrchestratorInner {
    engine: EngineConfig,
    configs: RwLock<BTreeMap<String, CheckConfig>>,
    checkers: RwLock<CheckerRegistry>,
    executor: Executor,
    results: ResultStore,
    metrics: MetricsAggregator,
    events: Arc<dyn HealthEventSink>,
}

impl OrchestratorInner {
    fn config(&self, id: &str) -> Result<CheckConfig> {
        self.configs
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| HealthError::not_found(id))
    }

    fn checker_for(&self, check_type: CheckType) -> Result<Arc<dyn Checker>> {
        self.checkers
            .read()
            .get(check_type)
            .ok_or_else(|| HealthError::unsupported_type(check_type.as_str()))
    }

    async fn execute(&self, id: &str, options: ExecutionOptions) -> Result<EvaluationResult> {
        let config = self.config(id)?;
        let checker = self.checker_for(config.check_type())?;

        let result = self.executor.execute(checker.as_ref(), &config, &options).await;

        let stored = self.results.record(id, result.clone());
        self.metrics.record(id, &result);
        if !stored {
            debug!("Check {} was unregistered during execution, result dropped", id);
        }

        self.events.on_result(&result);
        Ok(result)
    }
}

/// Builder for [`HealthOrchestrator`]
pub struct OrchestratorBuilder {
    engine: EngineConfig,
    checkers: CheckerRegistry,
    events: Arc<dyn HealthEventSink>,
}

impl OrchestratorBuilder {
    /// Replace the checker registry (defaults to the built-in checkers)
    pub fn checkers(mut self, checkers: CheckerRegistry) -> Self {
        self.checkers = checkers;
        self
    }

    /// Add or replace one checker
    pub fn checker(mut self, checker: Arc<dyn Checker>) -> Self {
        self.checkers.register(checker);
        self
    }

    /// Replace the event sink (defaults to [`TracingEventSink`])
    pub fn event_sink(mut self, events: Arc<dyn HealthEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn build(self) -> HealthOrchestrator {
        let inner = OrchestratorInner {
            executor: Executor::new(self.engine.clone()),
            results: ResultStore::new(self.engine.history_capacity),
            metrics: MetricsAggregator::new(),
            configs: RwLock::new(BTreeMap::new()),
            checkers: RwLock::new(self.checkers),
            events: self.events,
            engine: self.engine,
        };

        HealthOrchestrator {
            inner: Arc::new(inner),
            scheduler: Scheduler::new(),
        }
    }
}

/// Health-check orchestration engine
///
/// Registration, scheduling, execution and lookup of checks. Dropping the
/// orchestrator cancels every timer, like [`HealthOrchestrator::shutdown`].
pub struct HealthOrchestrator {
    inner: Arc<OrchestratorInner>,
    scheduler: Scheduler,
}

impl HealthOrchestrator {
    /// Orchestrator with the built-in checkers and tracing events
    pub fn new(engine: EngineConfig) -> Self {
        Self::builder(engine).build()
    }

    pub fn builder(engine: EngineConfig) -> OrchestratorBuilder {
        OrchestratorBuilder {
            engine,
            checkers: CheckerRegistry::with_defaults(),
            events: Arc::new(TracingEventSink),
        }
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.inner.engine
    }

    /// Register a new check and start its timer when it is enabled with an interval
    pub fn register(&self, config: CheckConfig) -> Result<()> {
        config.validate().map_err(HealthError::validation)?;

        // The registry guard is held while the timer is started so a
        // concurrent unregister cannot leave a timer behind.
        let mut configs = self.inner.configs.write();
        if configs.contains_key(&config.id) {
            return Err(HealthError::duplicate_id(&config.id));
        }
        self.inner.results.create(&config.id);
        self.inner.metrics.create(&config.id);
        configs.insert(config.id.clone(), config.clone());

        if let Err(e) = self.sync_schedule(&config) {
            self.remove_entries(&mut configs, &config.id);
            return Err(e);
        }
        drop(configs);

        info!(
            "Registered {} check {} ({})",
            config.check_type(),
            config.id,
            config.name
        );
        Ok(())
    }

    /// Replace a registered check, keeping its history and metrics
    pub fn update(&self, config: CheckConfig) -> Result<()> {
        config.validate().map_err(HealthError::validation)?;

        let mut configs = self.inner.configs.write();
        let existing = configs
            .get_mut(&config.id)
            .ok_or_else(|| HealthError::not_found(&config.id))?;
        let previous = std::mem::replace(existing, config.clone());

        if let Err(e) = self.sync_schedule(&config) {
            configs.insert(previous.id.clone(), previous);
            return Err(e);
        }
        drop(configs);

        info!("Updated check {}", config.id);
        Ok(())
    }

    /// Remove a check, cancelling its timer before dropping its state
    pub fn unregister(&self, id: &str) -> Result<CheckConfig> {
        let config = {
            let mut configs = self.inner.configs.write();
            if !configs.contains_key(id) {
                return Err(HealthError::not_found(id));
            }
            self.scheduler.cancel(id);
            self.remove_entries(&mut configs, id)
                .ok_or_else(|| HealthError::not_found(id))?
        };

        info!("Unregistered check {}", id);
        Ok(config)
    }

    /// Enable or disable a check, starting or cancelling its timer
    pub fn toggle(&self, id: &str, enabled: bool) -> Result<CheckConfig> {
        let config = {
            let mut configs = self.inner.configs.write();
            let config = configs.get_mut(id).ok_or_else(|| HealthError::not_found(id))?;
            let previous = std::mem::replace(&mut config.enabled, enabled);
            let snapshot = config.clone();
            if let Err(e) = self.sync_schedule(&snapshot) {
                config.enabled = previous;
                return Err(e);
            }
            snapshot
        };

        info!(
            "Check {} {}",
            id,
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(config)
    }

    /// Execute one check now with its configured parameters
    pub async fn execute_one(&self, id: &str) -> Result<EvaluationResult> {
        self.inner.execute(id, ExecutionOptions::default()).await
    }

    /// Execute one check now, overriding timeout and retry parameters
    pub async fn execute_one_with(
        &self,
        id: &str,
        options: ExecutionOptions,
    ) -> Result<EvaluationResult> {
        self.inner.execute(id, options).await
    }

    /// Execute every enabled check concurrently and aggregate the results
    ///
    /// A check whose execution fails outright (no checker for its type, a
    /// panicking checker) is reported as unhealthy instead of failing the batch.
    pub async fn execute_all(&self) -> HealthSummary {
        let configs: Vec<CheckConfig> = self
            .inner
            .configs
            .read()
            .values()
            .filter(|config| config.enabled)
            .cloned()
            .collect();

        debug!("Executing {} enabled checks", configs.len());

        let tasks: Vec<_> = configs
            .iter()
            .map(|config| {
                let inner = self.inner.clone();
                let id = config.id.clone();
                tokio::spawn(async move { inner.execute(&id, ExecutionOptions::default()).await })
            })
            .collect();

        let outcomes = futures::future::join_all(tasks).await;

        let results = configs
            .iter()
            .zip(outcomes)
            .map(|(config, outcome)| match outcome {
                Ok(Ok(result)) => result,
                Ok(Err(e)) => {
                    warn!("Check {} could not be executed: {}", config.id, e);
                    EvaluationResult::failed(&config.id, &config.name, config.check_type(), e.to_string())
                }
                Err(e) => {
                    warn!("Execution task for check {} failed: {}", config.id, e);
                    EvaluationResult::failed(
                        &config.id,
                        &config.name,
                        config.check_type(),
                        format!("Execution task failed: {}", e),
                    )
                }
            })
            .collect();

        let summary = HealthSummary::from_results(results);
        self.inner.events.on_summary(&summary);
        summary
    }

    /// Most recent stored result, without executing
    pub fn status_of(&self, id: &str) -> Option<EvaluationResult> {
        self.inner.results.latest(id)
    }

    /// Stored results oldest first, optionally only the most recent `limit`
    pub fn history_of(&self, id: &str, limit: Option<usize>) -> Result<Vec<EvaluationResult>> {
        self.inner
            .results
            .history(id, limit)
            .ok_or_else(|| HealthError::not_found(id))
    }

    pub fn metrics_of(&self, id: &str) -> Result<CheckMetrics> {
        self.inner
            .metrics
            .get(id)
            .ok_or_else(|| HealthError::not_found(id))
    }

    pub fn all_metrics(&self) -> HashMap<String, CheckMetrics> {
        self.inner.metrics.all()
    }

    /// Registered checks ordered by id
    pub fn list_configs(&self) -> Vec<CheckConfig> {
        self.inner.configs.read().values().cloned().collect()
    }

    pub fn get_config(&self, id: &str) -> Option<CheckConfig> {
        self.inner.configs.read().get(id).cloned()
    }

    /// Whether a check with this id is registered
    pub fn contains(&self, id: &str) -> bool {
        self.inner.configs.read().contains_key(id)
    }

    /// Install or replace the checker for its type, returning the replaced one
    pub fn register_checker(&self, checker: Arc<dyn Checker>) -> Option<Arc<dyn Checker>> {
        let check_type = checker.check_type();
        let replaced = self.inner.checkers.write().register(checker);
        info!("Registered checker for {} checks", check_type);
        replaced
    }

    pub fn supported_types(&self) -> Vec<CheckType> {
        self.inner.checkers.read().types()
    }

    pub fn is_scheduled(&self, id: &str) -> bool {
        self.scheduler.is_scheduled(id)
    }

    /// Ids with a running timer, sorted
    pub fn scheduled_checks(&self) -> Vec<String> {
        self.scheduler.scheduled_ids()
    }

    /// Cancel every timer. Safe to call repeatedly.
    pub fn shutdown(&self) {
        let cancelled = self.scheduler.shutdown();
        info!("Health orchestrator shut down, {} timers cancelled", cancelled);
    }

    /// Start, restart or cancel the timer to match the config.
    ///
    /// Callers hold the registry write guard; the scheduler never takes it.
    fn sync_schedule(&self, config: &CheckConfig) -> Result<()> {
        match config.interval_duration() {
            Some(period) if config.is_schedulable() => {
                self.scheduler.schedule(&config.id, period, self.tick_fn())
            }
            _ => {
                self.scheduler.cancel(&config.id);
                Ok(())
            }
        }
    }

    fn tick_fn(&self) -> TickFn {
        let inner = self.inner.clone();
        Arc::new(move |id: String| -> BoxFuture<'static, Result<()>> {
            let inner = inner.clone();
            async move {
                inner.execute(&id, ExecutionOptions::default()).await?;
                Ok(())
            }
            .boxed()
        })
    }

    fn remove_entries(
        &self,
        configs: &mut BTreeMap<String, CheckConfig>,
        id: &str,
    ) -> Option<CheckConfig> {
        let removed = configs.remove(id);
        self.inner.results.remove(id);
        self.inner.metrics.remove(id);
        removed
    }
}

impl std::fmt::Debug for HealthOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthOrchestrator")
            .field("checks", &self.inner.configs.read().keys().collect::<Vec<_>>())
            .field("scheduler", &self.scheduler)
            .finish()
    }
}
