//! Producer and progress task wiring.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::app::{log_progress, stop_progress_logging};
use crate::config::LOGGING_INTERVAL;
use crate::error_handling::PipelineError;
use crate::pipeline::{DispatchStats, Dispatcher, PipelineState, ProduceSummary};
use crate::sink::Sink;

use super::finalize::finalize_run;
use super::ExportReport;

/// Starts the dispatcher, runs `producer` on a blocking thread, then drains.
pub(super) async fn execute<F>(
    workers: usize,
    sink: Arc<dyn Sink>,
    producer: F,
) -> Result<ExportReport, PipelineError>
where
    F: FnOnce(&Dispatcher) -> Result<ProduceSummary, PipelineError> + Send + 'static,
{
    let start_time = Instant::now();
    let sink_name = sink.name();
    let mut state = PipelineState::Idle;

    let dispatcher = Dispatcher::start(sink, workers);
    let cancel = CancellationToken::new();
    let logging_task =
        spawn_progress_logger(start_time, dispatcher.stats(), cancel.child_token());

    state.advance(PipelineState::Decoding);
    let joined = tokio::task::spawn_blocking(move || {
        let produced = producer(&dispatcher);
        (dispatcher, produced)
    })
    .await;

    let result = match joined {
        Ok((dispatcher, produced)) => {
            finalize_run(dispatcher, produced, &mut state, sink_name, start_time).await
        }
        Err(e) => {
            // The dispatcher went down with the producer
            state.advance(PipelineState::Failed);
            Err(PipelineError::Producer(e))
        }
    };

    stop_progress_logging(cancel, logging_task).await;
    result
}

fn spawn_progress_logger(
    start_time: Instant,
    stats: Arc<DispatchStats>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(LOGGING_INTERVAL));
        // The first tick completes immediately
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    log_progress(start_time, &stats);
                }
                _ = cancel.cancelled() => {
                    break;
                }
            }
        }
    })
}
