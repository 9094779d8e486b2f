// End-to-end tests for active scanning: list scans with fuzz follow-up,
// short-link enumeration, run exclusivity, and cancellation.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use helpers::{scanner_fixture, ScriptedProbe};
use urlhunter::{run_scan, Config, DiscoveryEvent, FilterConfig};

#[tokio::test]
async fn list_scan_records_hits_and_fuzzes_them() {
    let probe = Arc::new(
        ScriptedProbe::new()
            .respond("http://app.example.com/portal", 200, "<title>Portal</title>")
            .respond("http://app.example.com/portal/admin", 200, "<title>Admin</title>"),
    );
    let (scanner, store, _rx) = scanner_fixture(Arc::clone(&probe), FilterConfig::default());

    scanner
        .scan_list(vec!["http://app.example.com/portal".to_string()])
        .await
        .unwrap();

    let sent = probe.sent_urls();
    assert_eq!(sent[0], "http://app.example.com/portal");
    // Dictionary order: admin is probed first.
    assert_eq!(sent[1], "http://app.example.com/portal/admin");

    let records = store.records();
    assert_eq!(records.len(), 2);
    let admin = records.iter().find(|r| r.url.ends_with("/admin")).unwrap();
    assert!(admin.notes.contains("admin"));
    assert_eq!(admin.title, "Admin");
}

#[tokio::test]
async fn blacklisted_status_is_probed_but_never_recorded_or_fuzzed() {
    let probe = Arc::new(ScriptedProbe::new().respond("http://app.example.com/gone", 404, ""));
    let (scanner, store, mut rx) = scanner_fixture(Arc::clone(&probe), FilterConfig::default());

    scanner
        .scan_list(vec!["http://app.example.com/gone".to_string()])
        .await
        .unwrap();

    // Fuzz is enabled, but the 404 base was rejected, so the dictionary
    // attack never fires: exactly one probe leaves the scanner.
    assert_eq!(probe.sent_urls(), ["http://app.example.com/gone"]);
    assert!(store.is_empty());
    while let Ok(event) = rx.try_recv() {
        assert!(!matches!(event, DiscoveryEvent::UrlDiscovered(_)));
    }
}

#[tokio::test]
async fn unreachable_url_is_never_fuzzed() {
    let probe = Arc::new(ScriptedProbe::new());
    let (scanner, store, _rx) = scanner_fixture(Arc::clone(&probe), FilterConfig::default());

    scanner
        .scan_list(vec!["http://app.example.com/dead".to_string()])
        .await
        .unwrap();

    assert_eq!(probe.sent_urls(), ["http://app.example.com/dead"]);
    assert!(store.is_empty());
}

#[tokio::test]
async fn only_one_list_scan_runs_at_a_time() {
    let probe = Arc::new(
        ScriptedProbe::new()
            .respond("http://a.example.com/1", 200, "")
            .respond("http://a.example.com/2", 200, ""),
    );
    let (scanner, _store, mut rx) = scanner_fixture(Arc::clone(&probe), FilterConfig::default());
    scanner.set_fuzz_enabled(false);

    let first = scanner.scan_list(vec![
        "http://a.example.com/1".to_string(),
        "http://a.example.com/2".to_string(),
    ]);
    while !scanner.is_scanning() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    let second = scanner.scan_list(vec!["http://a.example.com/1".to_string()]);
    second.await.unwrap();
    first.await.unwrap();

    let mut rejections = 0;
    let mut completions = 0;
    while let Ok(event) = rx.try_recv() {
        match event {
            DiscoveryEvent::Error(message) if message.contains("already running") => {
                rejections += 1
            }
            DiscoveryEvent::ScanComplete => completions += 1,
            _ => {}
        }
    }
    assert_eq!(rejections, 1);
    assert_eq!(completions, 1);
}

#[tokio::test]
async fn short_link_codes_are_generated_shortest_first() {
    let probe = Arc::new(ScriptedProbe::new().respond("http://s.example.com/ba", 200, ""));
    let (scanner, store, _rx) = scanner_fixture(
        Arc::clone(&probe),
        FilterConfig {
            short_link_brute_enabled: true,
            short_link_charset: "ab".to_string(),
            short_link_max_length: 2,
            ..Default::default()
        },
    );

    scanner
        .brute_force("http://s.example.com".to_string())
        .await
        .unwrap();

    assert_eq!(
        probe.sent_urls(),
        [
            "http://s.example.com/a",
            "http://s.example.com/b",
            "http://s.example.com/aa",
            "http://s.example.com/ab",
            "http://s.example.com/ba",
            "http://s.example.com/bb",
        ]
    );
    let records = store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, "http://s.example.com/ba");
}

#[tokio::test]
async fn disabling_brute_force_cancels_mid_enumeration() {
    let probe = Arc::new(ScriptedProbe::new());
    let (scanner, _store, _rx) = scanner_fixture(
        Arc::clone(&probe),
        FilterConfig {
            short_link_brute_enabled: true,
            short_link_charset: "abcdef".to_string(),
            short_link_max_length: 2,
            ..Default::default()
        },
    );

    let handle = scanner.brute_force("http://s.example.com".to_string());
    tokio::time::sleep(Duration::from_millis(200)).await;
    scanner.set_brute_force_enabled(false);
    handle.await.unwrap();

    let sent = probe.sent_urls();
    assert!(!sent.is_empty(), "enumeration should have started");
    assert!(sent.len() < 42, "enumeration should have been cancelled");
}

#[tokio::test]
async fn oversized_short_link_space_is_rejected_up_front() {
    let probe = Arc::new(ScriptedProbe::new());
    let (scanner, _store, mut rx) = scanner_fixture(
        Arc::clone(&probe),
        FilterConfig {
            short_link_brute_enabled: true,
            short_link_max_length: 10,
            ..Default::default()
        },
    );

    scanner
        .brute_force("http://s.example.com".to_string())
        .await
        .unwrap();

    assert!(probe.sent_urls().is_empty());
    match rx.recv().await {
        Some(DiscoveryEvent::Error(message)) => assert!(message.contains("exceeds")),
        other => panic!("expected Error event, got {other:?}"),
    }
}

#[tokio::test]
async fn auto_fuzz_toggle_forces_the_attack() {
    let probe = Arc::new(
        ScriptedProbe::new()
            .respond("http://a.example.com/x", 200, "")
            .respond("http://a.example.com/x/admin", 200, ""),
    );
    let (scanner, store, _rx) = scanner_fixture(
        Arc::clone(&probe),
        FilterConfig {
            auto_fuzz_enabled: true,
            ..Default::default()
        },
    );
    // The runtime flag is off; the persisted toggle still fuzzes hits.
    scanner.set_fuzz_enabled(false);

    scanner
        .scan_list(vec!["http://a.example.com/x".to_string()])
        .await
        .unwrap();

    assert!(probe
        .sent_urls()
        .contains(&"http://a.example.com/x/admin".to_string()));
    assert_eq!(store.len(), 2);
}

/// Probe that reports how many requests it has seen, so a test can react
/// at an exact candidate boundary.
struct CountingProbe {
    sent: std::sync::Mutex<Vec<String>>,
    counts: tokio::sync::mpsc::UnboundedSender<usize>,
}

#[async_trait::async_trait]
impl urlhunter::HttpProbe for CountingProbe {
    async fn send(
        &self,
        url: &str,
    ) -> Result<urlhunter::ProbeResponse, urlhunter::ProbeError> {
        let count = {
            let mut sent = self.sent.lock().unwrap();
            sent.push(url.to_string());
            sent.len()
        };
        let _ = self.counts.send(count);
        Err(urlhunter::ProbeError::InvalidUrl(url.to_string()))
    }
}

#[tokio::test]
async fn cancelling_after_the_third_candidate_prevents_the_fourth() {
    use urlhunter::{ActiveScanner, ConfigHandle, EventSink, MemoryStore, NullIpResolver, Store};

    let (counts_tx, mut counts_rx) = tokio::sync::mpsc::unbounded_channel();
    let probe = Arc::new(CountingProbe {
        sent: std::sync::Mutex::new(Vec::new()),
        counts: counts_tx,
    });
    let (sink, _events) = EventSink::channel(64);
    let scanner = ActiveScanner::new(
        Arc::clone(&probe) as Arc<dyn urlhunter::HttpProbe>,
        Arc::new(MemoryStore::new()) as Arc<dyn Store>,
        Arc::new(NullIpResolver),
        ConfigHandle::new(FilterConfig {
            short_link_brute_enabled: true,
            short_link_charset: "ab".to_string(),
            short_link_max_length: 2,
            ..Default::default()
        }),
        sink,
    );

    let handle = scanner.brute_force("http://s.example.com".to_string());
    while let Some(count) = counts_rx.recv().await {
        if count == 3 {
            scanner.set_brute_force_enabled(false);
            break;
        }
    }
    handle.await.unwrap();

    // The flag flips during the politeness delay after the third probe,
    // so candidate four is never sent.
    let sent = probe.sent.lock().unwrap().clone();
    assert_eq!(
        sent,
        [
            "http://s.example.com/a",
            "http://s.example.com/b",
            "http://s.example.com/aa",
        ]
    );
}

#[tokio::test]
async fn run_scan_fails_cleanly_on_missing_targets_file() {
    let config = Config {
        targets: std::path::PathBuf::from("/nonexistent/urls.txt"),
        ..Default::default()
    };
    let error = run_scan(config).await.unwrap_err();
    assert!(error.to_string().contains("targets file"));
}
