//! Top-level configuration file model

use super::{CheckConfig, EngineConfig};
use serde::{Deserialize, Serialize};

/// Contents of a `healthwatch.yaml` file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Engine defaults
    #[serde(default)]
    pub engine: EngineConfig,
    /// Checks registered at startup
    #[serde(default)]
    pub checks: Vec<CheckConfig>,
}

impl WatchConfig {
    /// Merge configurations; checks from `other` replace those with the same id
    pub fn merge(mut self, other: Self) -> Self {
        self.engine = self.engine.merge(other.engine);
        for check in other.checks {
            match self.checks.iter_mut().find(|c| c.id == check.id) {
                Some(existing) => *existing = check,
                None => self.checks.push(check),
            }
        }
        self
    }
}
