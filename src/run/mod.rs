//! Export runs.
//!
//! A run starts a dispatcher on the current runtime, moves it into a blocking
//! thread together with the producer, and drains it once the producer is
//! done. Deliveries run on Tokio worker tasks the whole time.

mod finalize;
mod task;

use std::sync::Arc;

use log::info;

use crate::config::PipelineConfig;
use crate::error_handling::{DecodeError, PipelineError};
use crate::geoip::{acquire_database, open_database, MmdbNetworks, NetworkEntry};
use crate::pipeline::produce;
use crate::sink::{build_sink, Sink};

/// Results of an export run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    /// Records that passed the filter and were queued
    pub records: usize,
    /// IPv6 networks dropped by the filter
    pub skipped_ipv6: usize,
    /// Batches submitted to the sink
    pub batches: usize,
    /// Batches the sink accepted
    pub delivered_batches: usize,
    /// Elapsed time in seconds, from dispatcher start to the end of the drain
    pub elapsed_seconds: f64,
}

/// Runs a full export: acquire the archive, decode every network, deliver
/// every batch.
///
/// # Errors
///
/// Any failure is fatal to the run: invalid configuration, archive
/// acquisition, database decoding, or the first failed delivery.
pub async fn run_export(config: PipelineConfig) -> Result<ExportReport, PipelineError> {
    config.validate()?;
    let sink = build_sink(&config.sink)?;

    let bytes = acquire_database(&config.source).await?;
    info!(
        "Exporting GeoIP networks to {} output ({} worker(s), {} records per batch)",
        sink.name(),
        config.workers,
        config.batch_size
    );

    let workers = config.workers;
    task::execute(workers, sink, move |dispatcher| {
        let reader = open_database(bytes)?;
        let networks = MmdbNetworks::new(&reader)?;
        produce(networks, &config, dispatcher)
    })
    .await
}

/// Runs the pipeline over an already-decoded entry stream.
///
/// `entries` is consumed on a blocking thread. `config.source` is validated
/// but not read.
pub async fn run_entries<I>(
    entries: I,
    config: PipelineConfig,
    sink: Arc<dyn Sink>,
) -> Result<ExportReport, PipelineError>
where
    I: IntoIterator<Item = Result<NetworkEntry, DecodeError>> + Send + 'static,
{
    config.validate()?;

    let workers = config.workers;
    task::execute(workers, sink, move |dispatcher| {
        produce(entries, &config, dispatcher)
    })
    .await
}
