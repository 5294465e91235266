//! Configuration validation
//!
//! - `check_validators`: per-check validation (ids, URLs, thresholds)
//! - `engine_validators`: engine defaults and whole-file validation
//! - `tests`: Test suite for all validators

mod check_validators;
mod engine_validators;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
