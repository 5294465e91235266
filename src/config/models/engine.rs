//! Engine-wide execution defaults

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Engine configuration
///
/// The `default_*` values are the last fallback when neither the per-call
/// options nor the check itself specify a timeout, retry count or delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Per-attempt timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,
    /// Retry attempts after the first
    #[serde(default = "default_retries")]
    pub default_retries: u32,
    /// Delay between attempts in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub default_retry_delay_ms: u64,
    /// Results retained per check
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: default_timeout_ms(),
            default_retries: default_retries(),
            default_retry_delay_ms: default_retry_delay_ms(),
            history_capacity: default_history_capacity(),
        }
    }
}

impl EngineConfig {
    /// Merge engine configurations (values differing from the defaults in `other` win)
    pub fn merge(mut self, other: Self) -> Self {
        if other.default_timeout_ms != default_timeout_ms() {
            self.default_timeout_ms = other.default_timeout_ms;
        }
        if other.default_retries != default_retries() {
            self.default_retries = other.default_retries;
        }
        if other.default_retry_delay_ms != default_retry_delay_ms() {
            self.default_retry_delay_ms = other.default_retry_delay_ms;
        }
        if other.history_capacity != default_history_capacity() {
            self.history_capacity = other.history_capacity;
        }
        self
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    pub fn default_retry_delay(&self) -> Duration {
        Duration::from_millis(self.default_retry_delay_ms)
    }
}
