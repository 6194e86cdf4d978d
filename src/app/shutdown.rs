//! Background task shutdown.

use tokio_util::sync::CancellationToken;

/// Stops the progress logging task and waits for it to exit.
pub async fn stop_progress_logging(
    cancel: CancellationToken,
    logging_task: tokio::task::JoinHandle<()>,
) {
    cancel.cancel();
    let _ = logging_task.await;
}
