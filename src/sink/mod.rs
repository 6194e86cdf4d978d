//! Delivery destinations for NDJSON batches.
//!
//! Every sink consumes one joined payload per call and either succeeds or
//! returns a [`DeliveryError`]. There are no partial successes and no retries;
//! the dispatcher treats any error as fatal for the run.

mod console;
mod http;
mod object_storage;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{SinkConfig, HTTP_INGEST_TIMEOUT};
use crate::error_handling::{DeliveryError, PipelineError};
use crate::initialization::init_http_client;

pub use console::ConsoleSink;
pub use http::HttpIngestSink;
pub use object_storage::{generate_object_key, ObjectStoreSink};

/// Delivery capability shared by every output.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Delivers one newline-delimited payload.
    async fn deliver(&self, payload: &str) -> Result<(), DeliveryError>;
}

/// Builds the sink selected by the configuration.
///
/// # Errors
///
/// Returns `PipelineError::Initialization` if the HTTP client cannot be built
/// and `PipelineError::SinkSetup` if the object store rejects its configuration.
pub fn build_sink(config: &SinkConfig) -> Result<Arc<dyn Sink>, PipelineError> {
    let sink: Arc<dyn Sink> = match config {
        SinkConfig::Console => Arc::new(ConsoleSink::stdout()),
        SinkConfig::HttpIngest {
            endpoint,
            ingest_token,
        } => {
            let client = init_http_client(HTTP_INGEST_TIMEOUT)?;
            Arc::new(HttpIngestSink::new(client, endpoint, ingest_token))
        }
        SinkConfig::ObjectStorage {
            bucket,
            access_key,
            secret_key,
            region,
        } => {
            let sink = ObjectStoreSink::from_credentials(bucket, access_key, secret_key, region)
                .map_err(|source| PipelineError::SinkSetup {
                    sink: config.name(),
                    source,
                })?;
            Arc::new(sink)
        }
    };
    log::debug!("Initialized {} output", sink.name());
    Ok(sink)
}
