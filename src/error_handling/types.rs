//! Error type definitions.
//!
//! Every failure in the pipeline is fatal to the run. These types carry the
//! failure up to the single top-level handler in `main` instead of
//! terminating the process where the failure happens.

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

/// Missing or invalid configuration, detected before any processing begins.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Neither a MaxMind license key nor a local database file was given.
    #[error("Missing MaxMind license key or database file")]
    MissingDatabaseSource,

    /// A parameter required by the selected output is empty.
    #[error("Missing {0}")]
    MissingParameter(&'static str),

    /// Batch capacity must be at least one record.
    #[error("Batch size must be greater than zero")]
    InvalidBatchSize,

    /// The worker pool needs at least one worker.
    #[error("Worker count must be greater than zero")]
    InvalidWorkerCount,
}

/// Archive fetch, read, decompress, or unpack failure.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// Reading the local archive failed.
    #[error("Failed to read database archive {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The download client could not be built.
    #[error("Failed to initialize download client: {0}")]
    Client(#[from] InitializationError),

    /// The download request failed at the transport level.
    #[error("Failed to download database archive: {0}")]
    Download(#[from] reqwest::Error),

    /// The download endpoint answered with a non-success status.
    #[error("Failed to download database archive: {status} - {body}")]
    DownloadStatus { status: String, body: String },

    /// The archive is larger than we are willing to buffer.
    #[error("Database archive too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: u64, max: usize },

    /// Gzip or tar decoding failed.
    #[error("Failed to unpack database archive: {0}")]
    Unpack(#[source] std::io::Error),

    /// The archive holds no `.mmdb` file.
    #[error("No .mmdb file found in database archive")]
    DatabaseNotFound,
}

/// Malformed source database or network prefix.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The MaxMind decoder rejected the database or one of its records.
    #[error("Failed to decode GeoIP database: {0}")]
    Database(#[from] maxminddb::MaxMindDbError),

    /// The source produced a network that is not valid CIDR notation.
    #[error("Invalid network prefix: {0}")]
    InvalidNetwork(String),

    /// A record could not be serialized to JSON.
    #[error("Failed to serialize record for {network}: {source}")]
    Serialize {
        network: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Non-success response or transport failure from a sink.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// Writing to the console failed (e.g. closed pipe).
    #[error("Console write failed: {0}")]
    Console(#[from] std::io::Error),

    /// The HTTP request could not be built or sent.
    #[error("HTTP ingest request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The ingest endpoint answered with anything other than 200 OK.
    #[error("HTTP ingest rejected batch: {status}")]
    Status { status: String },

    /// The object store rejected the upload or could not be configured.
    #[error("Object upload failed: {0}")]
    ObjectStore(#[from] object_store::Error),
}

/// Failures reported by the dispatcher.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A delivery task failed; the failing payload is kept verbatim.
    #[error("Delivery of batch {sequence} failed: {source}\npayload:\n{payload}")]
    Delivery {
        sequence: usize,
        payload: String,
        #[source]
        source: DeliveryError,
    },

    /// The dispatcher stopped accepting work after a failed delivery.
    #[error("Dispatcher halted after a failed delivery")]
    Halted,

    /// A worker task panicked or was cancelled by the runtime.
    #[error("Delivery worker terminated abnormally: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Umbrella error for a whole export run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Initialization(#[from] InitializationError),

    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Sink construction failed before any batch was produced.
    #[error("Failed to initialize {sink} output: {source}")]
    SinkSetup {
        sink: &'static str,
        #[source]
        source: DeliveryError,
    },

    /// The blocking decode task panicked.
    #[error("Decoding task terminated abnormally: {0}")]
    Producer(#[source] tokio::task::JoinError),
}
