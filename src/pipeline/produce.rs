//! The sequential producer: filter, serialize, batch, submit.

use crate::config::PipelineConfig;
use crate::error_handling::{DecodeError, PipelineError};
use crate::geoip::NetworkEntry;

use super::batcher::{Batch, Batcher};
use super::dispatcher::Dispatcher;
use super::filter::RecordFilter;

/// Counts from one pass over the network source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProduceSummary {
    /// Records that passed the filter and were queued
    pub records: usize,
    /// IPv6 networks dropped by the filter
    pub skipped_ipv6: usize,
    pub batches: usize,
}

/// Drives `entries` through the filter and batcher, submitting every batch.
///
/// Runs on the calling thread and never waits for deliveries. Stops at the
/// first decode error or as soon as the dispatcher refuses a batch.
pub fn produce<I>(
    entries: I,
    config: &PipelineConfig,
    dispatcher: &Dispatcher,
) -> Result<ProduceSummary, PipelineError>
where
    I: IntoIterator<Item = Result<NetworkEntry, DecodeError>>,
{
    let filter = RecordFilter::new(config.skip_ipv6);
    let mut batcher = Batcher::new(config.batch_size);
    let mut summary = ProduceSummary::default();

    for entry in entries {
        let Some(record) = filter.apply(entry?)? else {
            summary.skipped_ipv6 += 1;
            continue;
        };

        let line = serde_json::to_string(&record).map_err(|source| DecodeError::Serialize {
            network: record.network.clone(),
            source,
        })?;
        summary.records += 1;

        if let Some(batch) = batcher.append(line) {
            queue(dispatcher, batch, &mut summary)?;
        }
    }

    if let Some(batch) = batcher.flush() {
        queue(dispatcher, batch, &mut summary)?;
    }

    Ok(summary)
}

fn queue(
    dispatcher: &Dispatcher,
    batch: Batch,
    summary: &mut ProduceSummary,
) -> Result<(), PipelineError> {
    log::info!(
        "Queueing {} records for ingestion ({} total)",
        batch.len(),
        summary.records
    );
    dispatcher.submit(batch)?;
    summary.batches += 1;
    Ok(())
}
