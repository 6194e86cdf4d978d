//! Run finalization.

use std::time::Instant;

use log::info;

use crate::app::log_dispatch_summary;
use crate::error_handling::{DispatchError, PipelineError};
use crate::pipeline::{Dispatcher, PipelineState, ProduceSummary};

use super::ExportReport;

/// Settles the dispatcher according to how production ended.
///
/// - producer finished: drain, then report
/// - producer refused by a halted dispatcher: drain and return the delivery
///   failure that halted it
/// - any other producer error: abort the pool and return that error
pub(super) async fn finalize_run(
    dispatcher: Dispatcher,
    produced: Result<ProduceSummary, PipelineError>,
    state: &mut PipelineState,
    sink_name: &str,
    start_time: Instant,
) -> Result<ExportReport, PipelineError> {
    let produced = match produced {
        Ok(summary) => summary,
        Err(PipelineError::Dispatch(DispatchError::Halted)) => {
            state.advance(PipelineState::Failed);
            return match dispatcher.drain_and_wait().await {
                Err(err) => Err(err.into()),
                Ok(_) => Err(DispatchError::Halted.into()),
            };
        }
        Err(err) => {
            state.advance(PipelineState::Failed);
            let summary = dispatcher.abort().await;
            log_dispatch_summary(sink_name, &summary);
            return Err(err);
        }
    };

    state.advance(PipelineState::Dispatching);
    info!(
        "Queued {} records in {} batches ({} IPv6 networks skipped), waiting for deliveries",
        produced.records, produced.batches, produced.skipped_ipv6
    );

    state.advance(PipelineState::Draining);
    let dispatched = match dispatcher.drain_and_wait().await {
        Ok(summary) => summary,
        Err(err) => {
            state.advance(PipelineState::Failed);
            return Err(err.into());
        }
    };
    state.advance(PipelineState::Done);
    log_dispatch_summary(sink_name, &dispatched);

    Ok(ExportReport {
        records: produced.records,
        skipped_ipv6: produced.skipped_ipv6,
        batches: produced.batches,
        delivered_batches: dispatched.completed,
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
    })
}
