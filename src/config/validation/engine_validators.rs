//! Engine and whole-file validators

use super::Validate;
use crate::config::models::*;
use std::collections::HashSet;
use tracing::debug;

impl Validate for EngineConfig {
    fn validate(&self) -> Result<(), String> {
        if self.default_timeout_ms == 0 {
            return Err("Default timeout must be greater than 0".to_string());
        }

        if self.history_capacity == 0 {
            return Err("History capacity must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for WatchConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating {} check definitions", self.checks.len());

        self.engine.validate()?;

        let mut seen = HashSet::new();
        for check in &self.checks {
            check.validate()?;
            if !seen.insert(check.id.as_str()) {
                return Err(format!("Duplicate check id: {}", check.id));
            }
        }

        Ok(())
    }
}
