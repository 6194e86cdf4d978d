//! Error handling.
//!
//! This module provides the typed error taxonomy of an export run:
//! - **ConfigError**: missing or invalid parameters, detected before any work
//! - **AcquisitionError**: archive fetch/read/decompress/unpack failures
//! - **DecodeError**: malformed database or network prefix
//! - **DeliveryError**: sink failures (non-200 responses, upload errors)
//! - **DispatchError**: a failed delivery as seen by the worker pool
//!
//! All of them are fatal. They propagate as values up to `main`, which
//! decides the exit status.

mod types;

// Re-export public API
pub use types::{
    AcquisitionError, ConfigError, DecodeError, DeliveryError, DispatchError,
    InitializationError, PipelineError,
};
