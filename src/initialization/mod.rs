//! Application initialization.
//!
//! This module provides functions to initialize shared resources:
//! - Logger (plain or JSON, always on stderr)
//! - HTTP clients with fixed timeouts
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

// Re-export public API
pub use client::init_http_client;
pub use logger::init_logger_with;
