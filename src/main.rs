//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `geoip_export` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - The single top-level error handler
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::process;

use geoip_export::initialization::init_logger_with;
use geoip_export::{run_export, Cli, PipelineConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // This allows setting MAXMIND_LICENSE_KEY in .env without exporting it manually
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    let config = match PipelineConfig::try_from(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}\n", e);
            eprintln!("{}", Cli::command().render_usage());
            process::exit(1);
        }
    };

    match run_export(config).await {
        Ok(report) => {
            log::info!(
                "Exported {} records in {} batches ({} delivered, {} IPv6 networks skipped) in {:.1}s",
                report.records,
                report.batches,
                report.delivered_batches,
                report.skipped_ipv6,
                report.elapsed_seconds
            );
            Ok(())
        }
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    }
}
