//! Pagescan CLI - run one accessibility scan of one page
//!
//! Usage:
//!   pagescan scan <url>            Scan a page and print the results as JSON
//!   pagescan scan <url> --deep     Also record same-site pages for a deep scan
//!   pagescan config                Print the effective configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pagescan_core::{AppConfig, PageScanResult, ScanMetadata, ScanUrl};
use pagescan_scanner::{AxeScanResults, PageScanProcessor};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "pagescan")]
#[command(author, version, about = "Accessibility scan of a single web page")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a page and print the results as JSON
    Scan {
        /// Page to scan
        url: String,

        /// Record same-site pages for a deep scan
        #[arg(long)]
        deep: bool,

        /// Deep scan this page belongs to
        #[arg(long, value_name = "ID")]
        deep_scan_id: Option<String>,

        /// Page already known to the deep scan (repeatable)
        #[arg(long = "known-page", value_name = "URL")]
        known_pages: Vec<String>,

        /// axe-core script, overriding the configured path
        #[arg(long, value_name = "FILE")]
        axe_script: Option<PathBuf>,

        /// Never try the remote browser
        #[arg(long)]
        local: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// What `pagescan scan` prints.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanOutput {
    results: AxeScanResults,
    page_scan_result: PageScanResult,
}

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose {
        "debug"
    } else {
        "info,pagescan=debug"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::load().context("Failed to load config")?,
    };
    config.apply_env();
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Scan {
            url,
            deep,
            deep_scan_id,
            known_pages,
            axe_script,
            local,
        } => {
            if let Some(path) = axe_script {
                config.scanner.axe_script_path = Some(path);
            }
            if local {
                config.browser.remote_endpoint = None;
            }

            let url = ScanUrl::new(url).context("Invalid scan URL")?;
            let mut metadata = ScanMetadata::new(url, deep);
            if let Some(id) = deep_scan_id {
                metadata = metadata.with_deep_scan_id(id);
            }
            let mut page_scan_result =
                PageScanResult::for_scan(&metadata).with_known_pages(known_pages);

            let processor =
                PageScanProcessor::from_config(&config).context("Failed to set up scanner")?;

            info!("Scanning {} (deep scan: {})", metadata.url, metadata.deep_scan);
            let results = processor
                .scan(&metadata, &mut page_scan_result)
                .await
                .with_context(|| format!("Scan of {} failed", metadata.url))?;

            let output = ScanOutput {
                results,
                page_scan_result,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Commands::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
