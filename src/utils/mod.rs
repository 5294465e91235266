//! Utility modules
//!
//! - **error**: Error types shared by configuration loading and the orchestrator

pub mod error;
