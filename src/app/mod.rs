//! Run-time reporting helpers.
//!
//! Progress lines while records are queued, and the dispatch summary at
//! shutdown.

pub mod logging;
pub mod shutdown;

// Re-export public API
pub use logging::{log_dispatch_summary, log_progress};
pub use shutdown::stop_progress_logging;
