//! Integration tests for healthwatch
//!
//! These tests verify the interaction between configuration, checkers and the
//! orchestrator against real endpoints and databases.

pub mod config_tests;
pub mod database_tests;
pub mod error_handling_tests;
pub mod orchestrator_tests;
