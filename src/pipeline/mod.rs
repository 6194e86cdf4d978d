//! Record extraction, batching, and concurrent dispatch.
//!
//! One producer (decode, filter, serialize, batch) feeds a fixed-size pool of
//! delivery workers through an unbounded queue. Production is strictly
//! sequential because the database cursor is forward-only; delivery is
//! decoupled from it until the final drain.

mod batcher;
mod dispatcher;
mod filter;
mod produce;
mod state;

// Re-export public API
pub use batcher::{Batch, Batcher};
pub use dispatcher::{DispatchStats, DispatchSummary, DispatchTask, Dispatcher};
pub use filter::{AddressFamily, RecordFilter};
pub use produce::{produce, ProduceSummary};
pub use state::PipelineState;
