//! geoip_export library: GeoLite2 City database to NDJSON export
//!
//! This library streams every network of a MaxMind GeoLite2 City database,
//! serializes each one to a JSON record, groups records into fixed-size
//! batches, and delivers the batches through a worker pool to the console, an
//! HTTP ingest endpoint, or object storage.
//!
//! # Example
//!
//! ```no_run
//! use geoip_export::{run_export, DatabaseSource, PipelineConfig, SinkConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig {
//!     source: DatabaseSource::File("GeoLite2-City.tar.gz".into()),
//!     sink: SinkConfig::Console,
//!     skip_ipv6: true,
//!     ..Default::default()
//! };
//!
//! let report = run_export(config).await?;
//! eprintln!("Exported {} records in {} batches",
//!           report.records, report.batches);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a multi-threaded Tokio runtime: decoding runs on a
//! blocking thread while deliveries run on worker tasks.

mod app;
pub mod config;
mod error_handling;
pub mod geoip;
pub mod initialization;
pub mod pipeline;
mod run;
pub mod sink;

// Re-export public API
pub use config::{
    Cli, DatabaseSource, LogFormat, LogLevel, OutputCommand, PipelineConfig, SinkConfig,
};
pub use error_handling::{
    AcquisitionError, ConfigError, DecodeError, DeliveryError, DispatchError,
    InitializationError, PipelineError,
};
pub use geoip::{GeoRecord, NetworkEntry};
pub use run::{run_entries, run_export, ExportReport};
pub use sink::{ConsoleSink, HttpIngestSink, ObjectStoreSink, Sink};
