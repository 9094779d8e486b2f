//! Passive discovery listener.
//!
//! Consumes intercepted traffic events and classifies them against the
//! configured root domains. Classification (host extraction, matching,
//! filtering, dedup claim, subdomain bookkeeping) runs synchronously on
//! the caller's thread and must stay cheap; record construction, IP
//! resolution, and persistence are handed to a small background worker
//! pool so the interception path is never blocked by them.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, info, warn};
use tokio::sync::mpsc;

use crate::analyze::{extract_host, extract_path, extract_query, extract_subdomain, extract_title};
use crate::config::{ConfigHandle, FilterConfig, DISCOVERY_QUEUE_CAPACITY, LISTENER_WORKERS};
use crate::dedup::ProcessedSet;
use crate::dns::{classify_host, IpResolver};
use crate::events::{DiscoveryEvent, EventSink};
use crate::filter::should_reject;
use crate::matcher::{match_root_domain, RootDomainSet};
use crate::record::DiscoveryRecord;
use crate::storage::Store;

/// One intercepted request/response pair, as delivered by the traffic
/// interception layer. The response side is optional: classification of a
/// request-only event skips the status-code filter stage.
#[derive(Debug, Clone)]
pub struct TrafficEvent {
    /// Request URL as seen on the wire.
    pub url: String,
    /// HTTP method.
    pub method: String,
    /// Response status code, when a response was observed.
    pub status_code: Option<u16>,
    /// Response body text, when a response was observed.
    pub body: Option<String>,
    /// Raw request bytes, when the transport captured them.
    pub raw_request: Option<Vec<u8>>,
    /// Raw response bytes, when the transport captured them.
    pub raw_response: Option<Vec<u8>>,
}

/// A classified discovery waiting for record construction.
struct PendingDiscovery {
    event: TrafficEvent,
    host: String,
}

/// Passive discovery listener. See the module docs for the split between
/// the synchronous classification path and the background workers.
pub struct PassiveListener {
    enabled: AtomicBool,
    roots: RootDomainSet,
    config: ConfigHandle,
    processed: ProcessedSet,
    subdomains: Mutex<HashMap<String, BTreeSet<String>>>,
    sink: EventSink,
    jobs: mpsc::Sender<PendingDiscovery>,
}

impl PassiveListener {
    /// Creates a listener and spawns its background record workers.
    ///
    /// The listener starts enabled with an empty root domain set, so it
    /// discards everything until `update_root_domains` is called.
    pub fn new(
        config: ConfigHandle,
        sink: EventSink,
        store: Arc<dyn Store>,
        resolver: Arc<dyn IpResolver>,
    ) -> Arc<Self> {
        let (jobs, rx) = mpsc::channel::<PendingDiscovery>(DISCOVERY_QUEUE_CAPACITY);
        let rx = Arc::new(tokio::sync::Mutex::new(rx));

        let listener = Arc::new(Self {
            enabled: AtomicBool::new(true),
            roots: RootDomainSet::new(),
            config,
            processed: ProcessedSet::new(),
            subdomains: Mutex::new(HashMap::new()),
            sink: sink.clone(),
            jobs,
        });

        for _ in 0..LISTENER_WORKERS {
            let rx = Arc::clone(&rx);
            let store = Arc::clone(&store);
            let resolver = Arc::clone(&resolver);
            let sink = sink.clone();
            tokio::spawn(async move {
                loop {
                    let job = rx.lock().await.recv().await;
                    match job {
                        Some(pending) => {
                            build_and_emit(pending, store.as_ref(), resolver.as_ref(), &sink).await;
                        }
                        None => break,
                    }
                }
            });
        }

        listener
    }

    /// Enables or disables classification. When disabled, traffic events
    /// pass through untouched.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        info!(
            "Passive listener {}",
            if enabled { "enabled" } else { "disabled" }
        );
    }

    /// Whether the listener is currently classifying traffic.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Replaces the root domain set wholesale and notifies consumers.
    pub fn update_root_domains<I, S>(&self, domains: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let snapshot = self.roots.replace(domains);
        info!("Root domain set updated, {} domains in scope", snapshot.len());
        self.sink
            .emit_nonblocking(DiscoveryEvent::RootDomainsUpdated((*snapshot).clone()));
    }

    /// Atomically replaces the filter configuration.
    pub fn update_config(&self, config: FilterConfig) {
        self.config.replace(config);
        info!("Passive listener filter configuration updated");
    }

    /// Clears the processed-URL cache (periodic operator cleanup to bound
    /// memory). Already-emitted records are unaffected.
    pub fn clear_processed(&self) {
        self.processed.clear();
        info!("Cleared processed URL cache");
    }

    /// Snapshot of the discovered subdomains per root domain.
    pub fn discovered_subdomains(&self) -> HashMap<String, BTreeSet<String>> {
        match self.subdomains.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Classifies one intercepted traffic event.
    ///
    /// Runs synchronously and cheaply on the caller's thread; accepted
    /// candidates are queued for background record construction. Rejected
    /// candidates are discarded silently.
    pub fn on_traffic(&self, event: TrafficEvent) {
        if !self.is_enabled() {
            return;
        }

        let roots = self.roots.snapshot();
        if roots.is_empty() || event.url.is_empty() {
            return;
        }

        let Some(host) = extract_host(&event.url) else {
            return;
        };

        let Some(root_domain) = match_root_domain(&host, &roots) else {
            return;
        };

        let config = self.config.snapshot();
        if should_reject(&event.url, &host, event.status_code, &config) {
            return;
        }

        if !self.processed.try_claim(&event.url) {
            return;
        }

        let newly_seen = {
            let mut guard = match self.subdomains.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard
                .entry(root_domain.clone())
                .or_default()
                .insert(host.clone())
        };
        if newly_seen {
            self.sink.emit_nonblocking(DiscoveryEvent::SubdomainDiscovered {
                root_domain: root_domain.clone(),
                subdomain: host.clone(),
            });
        }

        debug!("Discovered URL {} (root domain {root_domain})", event.url);

        // The claim stands even if the queue is saturated; dropping here
        // keeps the interception path non-blocking.
        if self
            .jobs
            .try_send(PendingDiscovery { event, host })
            .is_err()
        {
            warn!("Discovery queue full, record construction skipped for this URL");
        }
    }
}

/// Builds the discovery record for an accepted traffic event, persists it,
/// and emits it. A failure here aborts only this record.
async fn build_and_emit(
    pending: PendingDiscovery,
    store: &dyn Store,
    resolver: &dyn IpResolver,
    sink: &EventSink,
) {
    let PendingDiscovery { event, host } = pending;

    let method = if event.method.is_empty() {
        "GET".to_string()
    } else {
        event.method.clone()
    };
    let mut record = DiscoveryRecord::new(event.url.clone(), method, host.clone());
    record.path = extract_path(&event.url);
    record.query = extract_query(&event.url);
    if let Some(status) = event.status_code {
        record.status_code = status;
    }
    if let Some(body) = &event.body {
        record.body_length = body.len();
        record.title = extract_title(body);
    }

    let (ip, is_internal) = classify_host(&host, resolver).await;
    record.ip = ip;
    record.is_internal = is_internal;
    record.subdomain = extract_subdomain(&host);
    record.notes = "discovered from intercepted proxy traffic".to_string();
    record.raw_request = event.raw_request;
    record.raw_response = event.raw_response;

    if let Err(e) = store.insert(&record).await {
        warn!("Failed to persist discovery for {}: {e}", record.url);
    }

    match (record.raw_request.clone(), record.raw_response.clone()) {
        (Some(raw_request), Some(raw_response)) => {
            sink.emit(DiscoveryEvent::UrlDiscoveredWithExchange {
                record,
                raw_request,
                raw_response,
            })
            .await;
        }
        _ => {
            sink.emit(DiscoveryEvent::UrlDiscovered(record)).await;
        }
    }
}
