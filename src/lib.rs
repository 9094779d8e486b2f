//! urlhunter library: URL discovery and confirmation for in-scope domains
//!
//! This library classifies observed traffic against a set of root domains,
//! filters out noise, and actively confirms candidate URLs by probing them,
//! optionally extending each hit with a dictionary fuzz attack and
//! enumerating short-link style URL spaces.
//!
//! # Example
//!
//! ```no_run
//! use urlhunter::{run_scan, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     targets: std::path::PathBuf::from("urls.txt"),
//!     fuzz: true,
//!     ..Default::default()
//! };
//!
//! let report = run_scan(config).await?;
//! println!(
//!     "Processed {} URLs, {} discoveries",
//!     report.total_urls, report.discovered
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

mod analyze;
pub mod config;
mod dedup;
mod dns;
mod error;
mod events;
mod filter;
pub mod initialization;
mod listener;
mod matcher;
mod probe;
mod record;
mod scanner;
mod storage;

// Re-export public API
pub use config::{Config, ConfigHandle, FilterConfig, LogFormat, LogLevel};
pub use dns::{DnsIpResolver, IpResolver, NullIpResolver};
pub use error::{InitializationError, ProbeError, StoreError};
pub use events::{DiscoveryEvent, EventSink};
pub use listener::{PassiveListener, TrafficEvent};
pub use matcher::RootDomainSet;
pub use probe::{HttpProbe, ProbeResponse, ReqwestProbe};
pub use record::{CheckStatus, DiscoveryRecord};
pub use run::{run_scan, ScanReport};
pub use scanner::{combination_count, ActiveScanner, ShortLinkGenerator};
pub use storage::{MemoryStore, Store};

// Internal run module (contains the CLI scanning logic)
mod run {
    use anyhow::{Context, Result};
    use std::sync::Arc;

    use log::{info, warn};
    use tokio::io::{AsyncBufReadExt, BufReader};

    use crate::analyze::validate_and_normalize_url;
    use crate::config::{Config, ConfigHandle, FilterConfig, EVENT_CHANNEL_CAPACITY};
    use crate::dns::DnsIpResolver;
    use crate::events::{DiscoveryEvent, EventSink};
    use crate::initialization::{init_client, init_resolver};
    use crate::probe::ReqwestProbe;
    use crate::scanner::ActiveScanner;
    use crate::storage::{MemoryStore, Store};

    /// Results of a discovery run.
    #[derive(Debug, Clone)]
    pub struct ScanReport {
        /// Number of candidate URLs read from the targets file
        pub total_urls: usize,
        /// Number of URL discoveries recorded
        pub discovered: usize,
        /// Number of contained errors reported during the run
        pub errors: usize,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Loads the filter configuration from the optional JSON file,
    /// falling back to defaults on a missing or unreadable file.
    async fn load_filter_config(config: &Config) -> FilterConfig {
        let Some(path) = &config.filter_config else {
            return FilterConfig::default();
        };
        match tokio::fs::read_to_string(path).await {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(filter) => filter,
                Err(e) => {
                    warn!(
                        "Invalid filter configuration in {}, using defaults: {e}",
                        path.display()
                    );
                    FilterConfig::default()
                }
            },
            Err(e) => {
                warn!(
                    "Failed to read filter configuration {}, using defaults: {e}",
                    path.display()
                );
                FilterConfig::default()
            }
        }
    }

    /// Runs a discovery scan with the provided configuration.
    ///
    /// This is the main entry point for the CLI. It reads candidate URLs
    /// from the targets file, probes them over the scanner pool, and
    /// optionally follows up with a short-link enumeration.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The targets file cannot be opened
    /// - The HTTP client or DNS resolver cannot be initialized
    pub async fn run_scan(config: Config) -> Result<ScanReport> {
        let file = tokio::fs::File::open(&config.targets)
            .await
            .with_context(|| format!("Failed to open targets file {}", config.targets.display()))?;
        let mut lines = BufReader::new(file).lines();
        let mut urls = Vec::new();
        while let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read targets file")?
        {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if let Some(url) = validate_and_normalize_url(trimmed) {
                urls.push(url);
            }
        }
        info!("Loaded {} candidate URLs from {}", urls.len(), config.targets.display());

        let client = init_client(&config).context("Failed to initialize HTTP client")?;
        let resolver = init_resolver().context("Failed to initialize DNS resolver")?;

        let filter_config = load_filter_config(&config).await;
        let config_handle = ConfigHandle::new(filter_config);
        let store = Arc::new(MemoryStore::new());
        let (sink, mut rx) = EventSink::channel(EVENT_CHANNEL_CAPACITY);

        let scanner = ActiveScanner::new(
            Arc::new(ReqwestProbe::new(client)),
            Arc::clone(&store) as Arc<dyn Store>,
            Arc::new(DnsIpResolver::new(resolver)),
            config_handle.clone(),
            sink,
        );
        scanner.set_fuzz_enabled(config.fuzz);

        // Drains engine events until every producer is dropped; returns
        // the discovery and error counts.
        let consumer = tokio::spawn(async move {
            let mut discovered = 0usize;
            let mut errors = 0usize;
            while let Some(event) = rx.recv().await {
                match event {
                    DiscoveryEvent::UrlDiscovered(record)
                    | DiscoveryEvent::UrlDiscoveredWithExchange { record, .. } => {
                        discovered += 1;
                        info!(
                            "Discovered {} ({} {})",
                            record.url,
                            record.status_code,
                            if record.title.is_empty() {
                                "untitled"
                            } else {
                                record.title.as_str()
                            }
                        );
                    }
                    DiscoveryEvent::ScanProgress { current, total } => {
                        info!("Scan progress: {current}/{total}");
                    }
                    DiscoveryEvent::ScanComplete => info!("Scan complete"),
                    DiscoveryEvent::Error(message) => {
                        errors += 1;
                        warn!("Engine error: {message}");
                    }
                    DiscoveryEvent::SubdomainDiscovered {
                        root_domain,
                        subdomain,
                    } => info!("New subdomain {subdomain} under {root_domain}"),
                    DiscoveryEvent::RootDomainsUpdated(domains) => {
                        info!("Root domain set replaced ({} domains)", domains.len())
                    }
                }
            }
            (discovered, errors)
        });

        let start_time = std::time::Instant::now();
        let total_urls = urls.len();

        scanner
            .scan_list(urls)
            .await
            .context("List scan task failed")?;

        if let Some(base_url) = &config.brute_force {
            let Some(base_url) = validate_and_normalize_url(base_url) else {
                anyhow::bail!("Invalid brute-force base URL");
            };
            // An explicit request overrides the persisted default-off
            // short-link toggle.
            let mut filter = (*config_handle.snapshot()).clone();
            filter.short_link_brute_enabled = true;
            config_handle.replace(filter);
            scanner
                .brute_force(base_url)
                .await
                .context("Brute-force task failed")?;
        }

        // Dropping the scanner closes the event channel and lets the
        // consumer finish.
        drop(scanner);
        let (discovered, errors) = consumer.await.context("Event consumer task failed")?;

        let elapsed_seconds = start_time.elapsed().as_secs_f64();
        Ok(ScanReport {
            total_urls,
            discovered,
            errors,
            elapsed_seconds,
        })
    }
}
