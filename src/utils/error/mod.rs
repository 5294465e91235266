//! Error handling
//!
//! This module defines the engine-level error type and the result alias used
//! throughout the crate.

pub mod error;


pub use error::*;
