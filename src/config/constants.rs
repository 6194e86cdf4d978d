//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including batch sizing, timeouts, endpoint templates, and size limits.

use std::time::Duration;

/// Number of serialized records per delivery batch.
pub const DEFAULT_BATCH_SIZE: usize = 12_500;

/// Number of concurrent delivery workers.
///
/// A single worker serializes deliveries while still decoupling delivery I/O
/// from database decoding.
pub const DEFAULT_WORKERS: usize = 1;

/// Seconds between progress log lines while records are being queued.
pub const LOGGING_INTERVAL: u64 = 10;

/// Environment variable name for the MaxMind license key
pub const MAXMIND_LICENSE_KEY_ENV: &str = "MAXMIND_LICENSE_KEY";

/// MaxMind GeoLite2-City download URL. `{license_key}` is substituted at runtime.
pub const MAXMIND_DOWNLOAD_URL_TEMPLATE: &str = "https://download.maxmind.com/app/geoip_download?edition_id=GeoLite2-City&suffix=tar.gz&license_key={license_key}";

/// Timeout for the database download (the City archive is tens of megabytes)
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Maximum accepted size of a downloaded database archive (200MB)
pub const MAX_DATABASE_DOWNLOAD_SIZE: usize = 200 * 1024 * 1024;

/// Observe HTTP ingest endpoint. `{customer_id}` is substituted at runtime.
pub const INGEST_URL_TEMPLATE: &str =
    "https://{customer_id}.collect.observeinc.com/v1/http/maxmind-geoip";

/// Per-request timeout for HTTP ingest deliveries
pub const HTTP_INGEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Content type of every delivered payload
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

// Object key naming: networks-<hex>.ndjson
pub const OBJECT_KEY_PREFIX: &str = "networks-";
pub const OBJECT_KEY_SUFFIX: &str = ".ndjson";
/// Number of lowercase hex characters in the random part of an object key
pub const OBJECT_KEY_RANDOM_LEN: usize = 10;
