//! Configuration types and CLI options.
//!
//! This module defines the enums and structs used for command-line argument
//! parsing, and the library-level [`PipelineConfig`] they resolve into.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_WORKERS, INGEST_URL_TEMPLATE, MAXMIND_DOWNLOAD_URL_TEMPLATE,
    MAXMIND_LICENSE_KEY_ENV,
};
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Print every network to stdout
/// geoip_export --maxmind-file GeoLite2-City.tar.gz output-console
///
/// # Download with a license key and ship to Observe, skipping IPv6
/// geoip_export --maxmind-apikey KEY --skip-ipv6 output-observe \
///     --customer-id 123456 --ingest-token TOKEN
///
/// # Upload batches to S3
/// geoip_export --maxmind-file GeoLite2-City.tar.gz output-s3 \
///     --bucket geo --access-key AKIA... --secret-key ... --region us-west-2
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "geoip_export",
    about = "Exports MaxMind GeoLite2 City networks as NDJSON batches."
)]
pub struct Cli {
    /// MaxMind license key used to download the GeoLite2-City archive
    #[arg(long, env = MAXMIND_LICENSE_KEY_ENV, hide_env_values = true)]
    pub maxmind_apikey: Option<String>,

    /// Read a local GeoLite2-City .tar.gz archive instead of downloading it
    #[arg(long, value_parser)]
    pub maxmind_file: Option<PathBuf>,

    /// Skip IPv6 networks
    #[arg(long)]
    pub skip_ipv6: bool,

    /// Number of records per delivered batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Number of concurrent delivery workers
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: OutputCommand,
}

/// Output destination selected on the command line.
#[derive(Debug, Clone, Subcommand)]
pub enum OutputCommand {
    /// Print NDJSON batches to standard output
    #[command(name = "output-console")]
    Console,

    /// POST NDJSON batches to the Observe HTTP ingest endpoint
    #[command(name = "output-observe")]
    Observe {
        /// Observe customer ID
        #[arg(long)]
        customer_id: String,

        /// Observe ingest token
        #[arg(long)]
        ingest_token: String,

        /// Full ingest URL, overriding the one derived from the customer ID
        #[arg(long)]
        ingest_url: Option<String>,
    },

    /// Upload each NDJSON batch as a new S3 object
    #[command(name = "output-s3")]
    S3 {
        /// S3 bucket
        #[arg(long)]
        bucket: String,

        /// AWS access key
        #[arg(long)]
        access_key: String,

        /// AWS secret key
        #[arg(long)]
        secret_key: String,

        /// AWS region
        #[arg(long)]
        region: String,
    },
}

/// Where the GeoLite2 archive comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseSource {
    /// Local `.tar.gz` archive
    File(PathBuf),
    /// Remote `.tar.gz` archive fetched over HTTP
    Download {
        /// License key, kept separately so it can be redacted from logs
        license_key: String,
        /// Fully resolved download URL
        url: String,
    },
}

impl DatabaseSource {
    /// Builds the MaxMind GeoLite2-City download source for a license key.
    pub fn maxmind(license_key: impl Into<String>) -> Self {
        let license_key = license_key.into();
        let url = MAXMIND_DOWNLOAD_URL_TEMPLATE.replace("{license_key}", &license_key);
        DatabaseSource::Download { license_key, url }
    }
}

/// Delivery destination and its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkConfig {
    /// Standard output
    Console,
    /// Authenticated HTTP ingest POST
    HttpIngest {
        endpoint: String,
        ingest_token: String,
    },
    /// Object storage upload with static credentials
    ObjectStorage {
        bucket: String,
        access_key: String,
        secret_key: String,
        region: String,
    },
}

impl SinkConfig {
    /// HTTP ingest configuration for an Observe customer.
    pub fn observe(customer_id: &str, ingest_token: impl Into<String>) -> Self {
        SinkConfig::HttpIngest {
            endpoint: INGEST_URL_TEMPLATE.replace("{customer_id}", customer_id),
            ingest_token: ingest_token.into(),
        }
    }

    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            SinkConfig::Console => "console",
            SinkConfig::HttpIngest { .. } => "http-ingest",
            SinkConfig::ObjectStorage { .. } => "object-storage",
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let required: Vec<(&'static str, &str)> = match self {
            SinkConfig::Console => Vec::new(),
            SinkConfig::HttpIngest {
                endpoint,
                ingest_token,
            } => vec![("ingest endpoint", endpoint), ("ingest token", ingest_token)],
            SinkConfig::ObjectStorage {
                bucket,
                access_key,
                secret_key,
                region,
            } => vec![
                ("S3 bucket", bucket),
                ("access key", access_key),
                ("secret key", secret_key),
                ("region", region),
            ],
        };

        match required.into_iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(ConfigError::MissingParameter(name)),
            None => Ok(()),
        }
    }
}

/// Pipeline configuration (no CLI dependencies).
///
/// Resolved once at startup and never mutated afterwards; every stage reads
/// from it instead of consulting global state.
///
/// # Examples
///
/// ```no_run
/// use geoip_export::{DatabaseSource, PipelineConfig, SinkConfig};
///
/// let config = PipelineConfig {
///     source: DatabaseSource::File("GeoLite2-City.tar.gz".into()),
///     sink: SinkConfig::Console,
///     skip_ipv6: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Archive to read the database from
    pub source: DatabaseSource,

    /// Delivery destination
    pub sink: SinkConfig,

    /// Records per batch
    pub batch_size: usize,

    /// Concurrent delivery workers
    pub workers: usize,

    /// Drop IPv6 networks before batching
    pub skip_ipv6: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: DatabaseSource::File(PathBuf::from("GeoLite2-City.tar.gz")),
            sink: SinkConfig::Console,
            batch_size: DEFAULT_BATCH_SIZE,
            workers: DEFAULT_WORKERS,
            skip_ipv6: false,
        }
    }
}

impl PipelineConfig {
    /// Checks the invariants every stage relies on.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a zero batch size, a zero worker count, an
    /// empty database source, or an empty sink parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkerCount);
        }
        match &self.source {
            DatabaseSource::File(path) if path.as_os_str().is_empty() => {
                return Err(ConfigError::MissingDatabaseSource);
            }
            DatabaseSource::Download { license_key, .. } if license_key.trim().is_empty() => {
                return Err(ConfigError::MissingDatabaseSource);
            }
            _ => {}
        }
        self.sink.validate()
    }
}

impl TryFrom<&Cli> for PipelineConfig {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        // A local file wins over the API key
        let source = match (&cli.maxmind_file, &cli.maxmind_apikey) {
            (Some(path), _) => DatabaseSource::File(path.clone()),
            (None, Some(key)) if !key.trim().is_empty() => DatabaseSource::maxmind(key.clone()),
            _ => return Err(ConfigError::MissingDatabaseSource),
        };

        let sink = match &cli.command {
            OutputCommand::Console => SinkConfig::Console,
            OutputCommand::Observe {
                customer_id,
                ingest_token,
                ingest_url,
            } => {
                if customer_id.trim().is_empty() {
                    return Err(ConfigError::MissingParameter("customer ID"));
                }
                match ingest_url {
                    Some(endpoint) => SinkConfig::HttpIngest {
                        endpoint: endpoint.clone(),
                        ingest_token: ingest_token.clone(),
                    },
                    None => SinkConfig::observe(customer_id, ingest_token.clone()),
                }
            }
            OutputCommand::S3 {
                bucket,
                access_key,
                secret_key,
                region,
            } => SinkConfig::ObjectStorage {
                bucket: bucket.clone(),
                access_key: access_key.clone(),
                secret_key: secret_key.clone(),
                region: region.clone(),
            },
        };

        let config = PipelineConfig {
            source,
            sink,
            batch_size: cli.batch_size,
            workers: cli.workers,
            skip_ipv6: cli.skip_ipv6,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_pipeline_config_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.batch_size, 12_500);
        assert_eq!(config.workers, 1);
        assert!(!config.skip_ipv6);
        assert_eq!(config.sink, SinkConfig::Console);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_maxmind_source_substitutes_license_key() {
        let source = DatabaseSource::maxmind("abc123");
        match source {
            DatabaseSource::Download { license_key, url } => {
                assert_eq!(license_key, "abc123");
                assert!(url.ends_with("license_key=abc123"));
                assert!(url.contains("edition_id=GeoLite2-City"));
                assert!(url.contains("suffix=tar.gz"));
            }
            other => panic!("expected download source, got {:?}", other),
        }
    }

    #[test]
    fn test_observe_endpoint_templated_by_customer() {
        let sink = SinkConfig::observe("123456", "token");
        assert_eq!(
            sink,
            SinkConfig::HttpIngest {
                endpoint: "https://123456.collect.observeinc.com/v1/http/maxmind-geoip"
                    .to_string(),
                ingest_token: "token".to_string(),
            }
        );
    }

    #[test]
    fn test_file_takes_precedence_over_api_key() {
        let cli = parse(&[
            "geoip_export",
            "--maxmind-apikey",
            "key",
            "--maxmind-file",
            "db.tar.gz",
            "output-console",
        ]);
        let config = PipelineConfig::try_from(&cli).unwrap();
        assert_eq!(config.source, DatabaseSource::File(PathBuf::from("db.tar.gz")));
    }

    #[test]
    fn test_missing_source_is_config_error() {
        let cli = Cli {
            maxmind_apikey: None,
            maxmind_file: None,
            skip_ipv6: false,
            batch_size: DEFAULT_BATCH_SIZE,
            workers: DEFAULT_WORKERS,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            command: OutputCommand::Console,
        };
        assert!(matches!(
            PipelineConfig::try_from(&cli),
            Err(ConfigError::MissingDatabaseSource)
        ));
    }

    #[test]
    fn test_empty_sink_parameter_is_config_error() {
        let cli = parse(&[
            "geoip_export",
            "--maxmind-file",
            "db.tar.gz",
            "output-s3",
            "--bucket",
            "geo",
            "--access-key",
            "",
            "--secret-key",
            "secret",
            "--region",
            "us-west-2",
        ]);
        assert!(matches!(
            PipelineConfig::try_from(&cli),
            Err(ConfigError::MissingParameter("access key"))
        ));
    }

    #[test]
    fn test_empty_customer_id_is_config_error() {
        let cli = parse(&[
            "geoip_export",
            "--maxmind-file",
            "db.tar.gz",
            "output-observe",
            "--customer-id",
            " ",
            "--ingest-token",
            "token",
        ]);
        assert!(matches!(
            PipelineConfig::try_from(&cli),
            Err(ConfigError::MissingParameter("customer ID"))
        ));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let config = PipelineConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBatchSize)
        ));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = PipelineConfig {
            workers: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWorkerCount)
        ));
    }

    #[test]
    fn test_ingest_url_override() {
        let cli = parse(&[
            "geoip_export",
            "--maxmind-file",
            "db.tar.gz",
            "output-observe",
            "--customer-id",
            "42",
            "--ingest-token",
            "token",
            "--ingest-url",
            "http://127.0.0.1:9000/ingest",
        ]);
        let config = PipelineConfig::try_from(&cli).unwrap();
        assert_eq!(
            config.sink,
            SinkConfig::HttpIngest {
                endpoint: "http://127.0.0.1:9000/ingest".to_string(),
                ingest_token: "token".to_string(),
            }
        );
    }
}
