//! Configuration management
//!
//! This module handles loading, validation, and merging of the engine
//! configuration and the check definitions registered at startup.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{HealthError, Result};
use std::env;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable overriding `engine.default_timeout_ms`
pub const ENV_DEFAULT_TIMEOUT_MS: &str = "HEALTHWATCH_DEFAULT_TIMEOUT_MS";
/// Environment variable overriding `engine.default_retries`
pub const ENV_DEFAULT_RETRIES: &str = "HEALTHWATCH_DEFAULT_RETRIES";
/// Environment variable overriding `engine.default_retry_delay_ms`
pub const ENV_DEFAULT_RETRY_DELAY_MS: &str = "HEALTHWATCH_DEFAULT_RETRY_DELAY_MS";
/// Environment variable overriding `engine.history_capacity`
pub const ENV_HISTORY_CAPACITY: &str = "HEALTHWATCH_HISTORY_CAPACITY";

/// Main configuration struct
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Engine defaults and startup checks
    pub watch: WatchConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| HealthError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml_str(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let watch: WatchConfig = serde_yaml::from_str(content)?;

        let config = Self { watch };
        config.validate()?;
        Ok(config)
    }

    /// Default configuration with environment overrides applied
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self::default().with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `HEALTHWATCH_*` environment overrides on top of this configuration
    pub fn with_env_overrides(mut self) -> Result<Self> {
        let engine = &mut self.watch.engine;

        if let Some(value) = env_var(ENV_DEFAULT_TIMEOUT_MS) {
            engine.default_timeout_ms = value
                .parse()
                .map_err(|e| HealthError::Config(format!("Invalid default timeout: {}", e)))?;
        }
        if let Some(value) = env_var(ENV_DEFAULT_RETRIES) {
            engine.default_retries = value
                .parse()
                .map_err(|e| HealthError::Config(format!("Invalid default retries: {}", e)))?;
        }
        if let Some(value) = env_var(ENV_DEFAULT_RETRY_DELAY_MS) {
            engine.default_retry_delay_ms = value
                .parse()
                .map_err(|e| HealthError::Config(format!("Invalid default retry delay: {}", e)))?;
        }
        if let Some(value) = env_var(ENV_HISTORY_CAPACITY) {
            engine.history_capacity = value
                .parse()
                .map_err(|e| HealthError::Config(format!("Invalid history capacity: {}", e)))?;
        }

        Ok(self)
    }

    /// Get engine configuration
    pub fn engine(&self) -> &EngineConfig {
        &self.watch.engine
    }

    /// Get startup checks
    pub fn checks(&self) -> &[CheckConfig] {
        &self.watch.checks
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.watch
            .validate()
            .map_err(|e| HealthError::Config(format!("Invalid configuration: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.watch = self.watch.merge(other.watch);
        self
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.watch)?)
    }
}

fn env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
