//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (batch size, timeouts, endpoint templates)
//! - CLI option types and parsing
//! - The immutable [`PipelineConfig`] resolved once at startup

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{
    Cli, DatabaseSource, LogFormat, LogLevel, OutputCommand, PipelineConfig, SinkConfig,
};
