//! Progress logging utilities.

use log::info;
use std::time::Instant;

use crate::pipeline::{DispatchStats, DispatchSummary};

/// Logs how many batches have been queued and delivered so far.
///
/// # Arguments
///
/// * `start_time` - The start time of the run
/// * `stats` - Live dispatcher counters
pub fn log_progress(start_time: Instant, stats: &DispatchStats) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let completed = stats.completed();
    let rate = if elapsed_secs > 0.0 {
        completed as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Queued {} batches, delivered {} in {:.2} seconds (~{:.2} batches/sec, {} in flight)",
        stats.submitted(),
        completed,
        elapsed_secs,
        rate,
        stats.in_flight()
    );
}

/// Logs the final batch counts once the dispatcher has stopped.
pub fn log_dispatch_summary(sink: &str, summary: &DispatchSummary) {
    info!(
        "{} output: {} batches submitted, {} completed",
        sink, summary.submitted, summary.completed
    );
    if summary.failed > 0 || summary.abandoned > 0 {
        log::warn!(
            "{} output: {} batches failed, {} abandoned",
            sink,
            summary.failed,
            summary.abandoned
        );
    }
}
