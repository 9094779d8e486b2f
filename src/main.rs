//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `urlhunter` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use urlhunter::initialization::init_logger_with;
use urlhunter::{run_scan, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_scan(config).await {
        Ok(report) => {
            println!(
                "✅ Processed {} URL{} ({} discovered, {} errors) in {:.1}s",
                report.total_urls,
                if report.total_urls == 1 { "" } else { "s" },
                report.discovered,
                report.errors,
                report.elapsed_seconds
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("urlhunter error: {:#}", e);
            process::exit(1);
        }
    }
}
