//! Active confirmation scanner.
//!
//! Probes operator-supplied URL lists over a bounded worker pool. A run
//! processes its list sequentially with a fixed inter-probe delay; the
//! pool bounds how many runs (list scans and brute-force enumerations)
//! execute concurrently. Cancellation is cooperative through atomic flags
//! checked between probes, so a stop request takes effect at the next
//! candidate boundary.

mod brute;
mod fuzz;

pub use brute::{combination_count, ShortLinkGenerator};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::analyze::{extract_host, extract_path, extract_query, extract_subdomain, extract_title};
use crate::config::{
    ConfigHandle, FilterConfig, BRUTE_FORCE_MAX_COMBINATIONS, SCANNER_POOL_WIDTH, SCAN_PROBE_DELAY,
};
use crate::dns::{classify_host, IpResolver};
use crate::events::{DiscoveryEvent, EventSink};
use crate::filter::{is_extension_blacklisted, is_host_blacklisted, is_status_blacklisted};
use crate::probe::HttpProbe;
use crate::record::DiscoveryRecord;
use crate::storage::Store;

/// Drives active scan runs. Shared behind an [`Arc`]; runs execute on
/// spawned tasks while control methods stay callable from anywhere.
pub struct ActiveScanner {
    probe: Arc<dyn HttpProbe>,
    store: Arc<dyn Store>,
    resolver: Arc<dyn IpResolver>,
    config: ConfigHandle,
    sink: EventSink,
    scanning: AtomicBool,
    fuzz_enabled: AtomicBool,
    brute_force_enabled: AtomicBool,
    pool: Arc<Semaphore>,
    max_combinations: u128,
}

impl ActiveScanner {
    /// Creates a scanner with the default pool width and combination cap.
    pub fn new(
        probe: Arc<dyn HttpProbe>,
        store: Arc<dyn Store>,
        resolver: Arc<dyn IpResolver>,
        config: ConfigHandle,
        sink: EventSink,
    ) -> Arc<Self> {
        Arc::new(Self {
            probe,
            store,
            resolver,
            config,
            sink,
            scanning: AtomicBool::new(false),
            fuzz_enabled: AtomicBool::new(true),
            brute_force_enabled: AtomicBool::new(true),
            pool: Arc::new(Semaphore::new(SCANNER_POOL_WIDTH)),
            max_combinations: BRUTE_FORCE_MAX_COMBINATIONS,
        })
    }

    /// Whether a list scan is currently running.
    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::SeqCst)
    }

    /// Requests cancellation of the running list scan. Takes effect at the
    /// next URL boundary.
    pub fn stop_scan(&self) {
        self.scanning.store(false, Ordering::SeqCst);
        info!("Scan cancellation requested");
    }

    /// Enables or disables the dictionary fuzz attack for future hits.
    pub fn set_fuzz_enabled(&self, enabled: bool) {
        self.fuzz_enabled.store(enabled, Ordering::SeqCst);
    }

    /// Whether the dictionary fuzz attack is enabled.
    pub fn is_fuzz_enabled(&self) -> bool {
        self.fuzz_enabled.load(Ordering::SeqCst)
    }

    /// Enables or disables short-link brute-force enumeration. Disabling
    /// cancels a running enumeration at the next candidate boundary.
    pub fn set_brute_force_enabled(&self, enabled: bool) {
        self.brute_force_enabled.store(enabled, Ordering::SeqCst);
    }

    /// Whether short-link brute-force enumeration is enabled.
    pub fn is_brute_force_enabled(&self) -> bool {
        self.brute_force_enabled.load(Ordering::SeqCst)
    }

    pub(crate) fn brute_force_allowed(&self) -> bool {
        self.brute_force_enabled.load(Ordering::SeqCst)
    }

    pub(crate) fn max_combinations(&self) -> u128 {
        self.max_combinations
    }

    pub(crate) fn sink(&self) -> &EventSink {
        &self.sink
    }

    pub(crate) fn pool(&self) -> &Arc<Semaphore> {
        &self.pool
    }

    /// Resolves the filter configuration for a run: the persisted
    /// configuration wins, then the live handle snapshot.
    pub(crate) async fn scan_config(&self) -> FilterConfig {
        match self.store.load_config().await {
            Ok(Some(config)) => config,
            Ok(None) => (*self.config.snapshot()).clone(),
            Err(e) => {
                warn!("Failed to load persisted filter configuration: {e}");
                (*self.config.snapshot()).clone()
            }
        }
    }

    /// Probes a single URL and records it if it passes the status filter.
    ///
    /// Returns the record for an accepted candidate, `None` when the probe
    /// failed or the response was filtered. Probe failures are contained:
    /// they never abort the surrounding run.
    pub(crate) async fn probe_candidate(
        &self,
        url: &str,
        config: &FilterConfig,
        notes: &str,
    ) -> Option<DiscoveryRecord> {
        let host = extract_host(url)?;

        let response = match self.probe.send(url).await {
            Ok(response) => response,
            Err(e) => {
                debug!("Probe failed for {url}: {e}");
                return None;
            }
        };

        if is_status_blacklisted(response.status_code, config) {
            debug!(
                "Probed {url} but status {} is blacklisted",
                response.status_code
            );
            return None;
        }

        let mut record = DiscoveryRecord::new(url, "GET", host.clone());
        record.path = extract_path(url);
        record.query = extract_query(url);
        record.status_code = response.status_code;
        record.body_length = response.body_length();
        record.title = extract_title(&response.body);
        let (ip, is_internal) = classify_host(&host, self.resolver.as_ref()).await;
        record.ip = ip;
        record.is_internal = is_internal;
        record.subdomain = extract_subdomain(&host);
        record.notes = notes.to_string();

        if let Err(e) = self.store.insert(&record).await {
            warn!("Failed to persist scan result for {url}: {e}");
        }
        self.sink
            .emit(DiscoveryEvent::UrlDiscovered(record.clone()))
            .await;
        Some(record)
    }

    /// Probes one URL with the current configuration, outside any run.
    pub async fn scan_one(&self, url: &str) -> Option<DiscoveryRecord> {
        let config = self.scan_config().await;
        self.probe_candidate(url, &config, "confirmed by active probe")
            .await
    }

    /// Starts a list scan on a background task.
    ///
    /// At most one list scan runs at a time: a second start request is
    /// rejected with an [`DiscoveryEvent::Error`] and leaves the running
    /// scan untouched. The returned handle resolves when the run finishes
    /// or is cancelled.
    pub fn scan_list(self: &Arc<Self>, urls: Vec<String>) -> JoinHandle<()> {
        let scanner = Arc::clone(self);
        tokio::spawn(async move {
            if scanner.scanning.swap(true, Ordering::SeqCst) {
                scanner
                    .sink
                    .emit(DiscoveryEvent::Error(
                        "a list scan is already running".to_string(),
                    ))
                    .await;
                return;
            }

            let permit = match scanner.pool.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    scanner.scanning.store(false, Ordering::SeqCst);
                    return;
                }
            };

            scanner.run_list(urls).await;

            drop(permit);
            scanner.scanning.store(false, Ordering::SeqCst);
        })
    }

    async fn run_list(&self, urls: Vec<String>) {
        let config = self.scan_config().await;

        // Host and extension rejections are known before probing, so the
        // list is filtered up front. Rejected URLs cost no probe, no
        // delay, and no progress slot.
        let supplied = urls.len();
        let targets: Vec<String> = urls
            .into_iter()
            .filter(|url| match extract_host(url) {
                Some(host) => {
                    !is_host_blacklisted(&host, &config) && !is_extension_blacklisted(url, &config)
                }
                None => {
                    warn!("Skipping URL with no recoverable host: {url}");
                    false
                }
            })
            .collect();
        let total = targets.len();
        info!(
            "Starting list scan of {total} URLs ({} filtered out)",
            supplied - total
        );

        for (index, url) in targets.iter().enumerate() {
            if !self.scanning.load(Ordering::SeqCst) {
                info!("List scan cancelled after {index} of {total} URLs");
                break;
            }

            let hit = self
                .probe_candidate(url, &config, "confirmed by active scan")
                .await;
            // The dictionary attack chains only off an accepted hit. The
            // persisted auto-fuzz toggle forces it even when the runtime
            // flag is off.
            if hit.is_some() && (self.is_fuzz_enabled() || config.auto_fuzz_enabled) {
                self.fuzz_attack(url, &config).await;
            }

            self.sink
                .emit(DiscoveryEvent::ScanProgress {
                    current: index + 1,
                    total,
                })
                .await;
            sleep(SCAN_PROBE_DELAY).await;
        }

        self.sink.emit(DiscoveryEvent::ScanComplete).await;
        info!("List scan finished");
    }
}
