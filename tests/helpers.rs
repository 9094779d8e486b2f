// Shared test helpers for assembling the discovery engine against fakes.
//
// This module provides common utilities used across multiple test files to
// reduce duplication: a scripted HTTP probe and constructors that wire the
// engine together with an in-memory store and a null resolver.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use urlhunter::{
    ActiveScanner, ConfigHandle, DiscoveryEvent, EventSink, FilterConfig, HttpProbe, MemoryStore,
    NullIpResolver, PassiveListener, ProbeError, ProbeResponse, Store, TrafficEvent,
};

/// HTTP probe fake with per-URL scripted responses. URLs without a script
/// fail the way an unreachable host would.
pub struct ScriptedProbe {
    responses: HashMap<String, ProbeResponse>,
    pub sent: Mutex<Vec<String>>,
}

#[allow(dead_code)] // Used by other test files
impl ScriptedProbe {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(mut self, url: &str, status_code: u16, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            ProbeResponse {
                status_code,
                body: body.to_string(),
            },
        );
        self
    }

    pub fn sent_urls(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpProbe for ScriptedProbe {
    async fn send(&self, url: &str) -> Result<ProbeResponse, ProbeError> {
        self.sent.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(response) => Ok(response.clone()),
            None => Err(ProbeError::InvalidUrl(url.to_string())),
        }
    }
}

/// Builds a scanner over the scripted probe with an in-memory store.
#[allow(dead_code)] // Used by other test files
pub fn scanner_fixture(
    probe: Arc<ScriptedProbe>,
    filter_config: FilterConfig,
) -> (
    Arc<ActiveScanner>,
    Arc<MemoryStore>,
    mpsc::Receiver<DiscoveryEvent>,
) {
    let (sink, rx) = EventSink::channel(1024);
    let store = Arc::new(MemoryStore::new());
    let scanner = ActiveScanner::new(
        probe,
        Arc::clone(&store) as Arc<dyn Store>,
        Arc::new(NullIpResolver),
        ConfigHandle::new(filter_config),
        sink,
    );
    (scanner, store, rx)
}

/// Builds a passive listener with an in-memory store.
#[allow(dead_code)] // Used by other test files
pub fn listener_fixture(
    filter_config: FilterConfig,
) -> (
    Arc<PassiveListener>,
    Arc<MemoryStore>,
    mpsc::Receiver<DiscoveryEvent>,
) {
    let (sink, rx) = EventSink::channel(1024);
    let store = Arc::new(MemoryStore::new());
    let listener = PassiveListener::new(
        ConfigHandle::new(filter_config),
        sink,
        Arc::clone(&store) as Arc<dyn Store>,
        Arc::new(NullIpResolver),
    );
    (listener, store, rx)
}

/// Builds a GET traffic event with a 200 response and an empty body.
#[allow(dead_code)] // Used by other test files
pub fn ok_traffic(url: &str) -> TrafficEvent {
    TrafficEvent {
        url: url.to_string(),
        method: "GET".to_string(),
        status_code: Some(200),
        body: Some(String::new()),
        raw_request: None,
        raw_response: None,
    }
}

/// Polls the store until it holds `expected` records or a second passes.
#[allow(dead_code)] // Used by other test files
pub async fn wait_for_records(store: &MemoryStore, expected: usize) {
    for _ in 0..100 {
        if store.len() >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "store never reached {expected} records (has {})",
        store.len()
    );
}
