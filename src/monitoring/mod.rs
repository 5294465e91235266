//! Health-check orchestration
//!
//! This module provides the checkers, the retrying execution controller, the
//! per-check scheduler, the bounded result history and the metrics aggregator,
//! combined behind [`HealthOrchestrator`].

// Public submodules
pub mod events;
pub mod health;

// Internal submodules
mod aggregator;
mod bounded;
mod executor;
mod orchestrator;
mod scheduler;
mod store;
mod types;


// Re-export public types
pub use aggregator::MetricsAggregator;
pub use events::{HealthEventSink, TracingEventSink};
pub use executor::{ExecutionPlan, Executor};
pub use health::{CheckOutcome, Checker, CheckerError, CheckerRegistry};
pub use orchestrator::{HealthOrchestrator, OrchestratorBuilder};
pub use scheduler::{Scheduler, TickFn};
pub use store::ResultStore;
pub use types::{
    CheckMetrics, EvaluationResult, ExecutionOptions, HealthStatus, HealthSummary, Metadata,
    overall_status,
};
