//! Configuration data models
//!
//! This module defines the configuration structures read from the
//! `healthwatch.yaml` file: engine-wide execution defaults and the list of
//! check definitions.

pub mod check;
pub mod engine;
pub mod watch;

// Re-export all configuration types
pub use check::*;
pub use engine::*;
pub use watch::*;

/// Longest accepted scheduling interval (one year)
pub const MAX_INTERVAL_MS: u64 = 365 * 24 * 60 * 60 * 1000;

/// Default per-attempt timeout in milliseconds
pub fn default_timeout_ms() -> u64 {
    5000
}

/// Default number of retry attempts after the first
pub fn default_retries() -> u32 {
    0
}

/// Default delay between attempts in milliseconds
pub fn default_retry_delay_ms() -> u64 {
    1000
}

/// Default number of results retained per check
pub fn default_history_capacity() -> usize {
    100
}

/// Default HTTP method for endpoint checks
pub fn default_method() -> String {
    "GET".to_string()
}

/// Default accepted status codes for endpoint checks
pub fn default_expected_status_codes() -> Vec<u16> {
    vec![200]
}

pub fn default_true() -> bool {
    true
}
