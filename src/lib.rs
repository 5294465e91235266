//! # healthwatch
//!
//! Health-check orchestration engine: register checks against HTTP endpoints,
//! databases and local system resources, run them on independent schedules
//! with timeouts and retries, and query an aggregated health state.
//!
//! ## Features
//!
//! - **Pluggable checkers**: built-in HTTP, database and system checkers, plus
//!   user-supplied checkers for custom check types
//! - **Retry policy**: per-attempt timeouts with retry-with-delay
//! - **Scheduling**: one independent timer per enabled check
//! - **History and metrics**: bounded per-check result history, uptime and
//!   average response time
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use healthwatch::{CheckConfig, CheckSpec, HealthOrchestrator, HttpCheckSpec};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = healthwatch::Config::from_file("config/healthwatch.yaml").await?;
//!     let orchestrator = HealthOrchestrator::new(config.engine().clone());
//!
//!     orchestrator.register(
//!         CheckConfig::new(
//!             "api",
//!             "Public API",
//!             CheckSpec::Http(HttpCheckSpec::new("https://example.com/health")),
//!         )
//!         .with_retries(2),
//!     )?;
//!
//!     let summary = orchestrator.execute_all().await;
//!     println!("{}: {} checks", summary.status, summary.total);
//!
//!     orchestrator.shutdown();
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod monitoring;
pub mod utils;

// Re-export main types
pub use config::{
    BodyMatcher, CheckConfig, CheckSpec, CheckType, Config, CustomCheckSpec, DatabaseCheckSpec,
    DatabaseDialect, EngineConfig, HttpCheckSpec, ResourceCheck, ResourceKind, SystemCheckSpec,
};
pub use monitoring::{
    CheckMetrics, CheckOutcome, Checker, CheckerError, CheckerRegistry, EvaluationResult,
    ExecutionOptions, HealthEventSink, HealthOrchestrator, HealthStatus, HealthSummary,
    TracingEventSink,
};
pub use utils::error::{HealthError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp, seconds since the epoch
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
            rust_version: option_env!("RUST_VERSION").unwrap_or("unknown"),
        }
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
