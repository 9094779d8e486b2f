//! Dictionary fuzz attack.
//!
//! After a confirmed hit, each dictionary word is appended to the hit URL
//! as an extra path segment and probed in dictionary order. Hits that pass
//! the status filter are recorded with the word noted; everything else is
//! discarded silently.

use log::{debug, info};
use tokio::time::sleep;

use crate::analyze::build_candidate_url;
use crate::config::{FilterConfig, FUZZ_PROBE_DELAY};

use super::ActiveScanner;

impl ActiveScanner {
    /// Probes every dictionary word against the base URL.
    ///
    /// Checks the fuzz toggle and scan cancellation before each word, so
    /// disabling either stops the attack at the next word boundary.
    pub(crate) async fn fuzz_attack(&self, base_url: &str, config: &FilterConfig) {
        if config.fuzz_dictionary.is_empty() {
            return;
        }
        debug!(
            "Fuzzing {base_url} with {} dictionary words",
            config.fuzz_dictionary.len()
        );

        let mut hits = 0usize;
        for word in &config.fuzz_dictionary {
            let allowed = self.is_fuzz_enabled() || config.auto_fuzz_enabled;
            if !allowed || !self.is_scanning() {
                debug!("Fuzz attack on {base_url} stopped before word {word}");
                break;
            }

            let candidate = build_candidate_url(base_url, word);
            let notes = format!("fuzz hit for dictionary word \"{word}\"");
            if self
                .probe_candidate(&candidate, config, &notes)
                .await
                .is_some()
            {
                hits += 1;
            }
            sleep(FUZZ_PROBE_DELAY).await;
        }

        if hits > 0 {
            info!("Fuzz attack on {base_url} produced {hits} hits");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{scanner_with, ScriptedProbe};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fuzz_probes_dictionary_in_order_and_records_hits() {
        let probe = Arc::new(
            ScriptedProbe::new()
                .respond("http://a.example.com/x", 200, "")
                .respond("http://a.example.com/x/admin", 200, "<title>Admin</title>")
                .respond("http://a.example.com/x/backup", 200, ""),
        );
        let (scanner, store, _rx) = scanner_with(Arc::clone(&probe));

        scanner
            .scan_list(vec!["http://a.example.com/x".to_string()])
            .await
            .unwrap();

        let sent = probe.sent.lock().unwrap().clone();
        // Base URL first, then the dictionary in configured order.
        assert_eq!(sent[0], "http://a.example.com/x");
        assert_eq!(sent[1], "http://a.example.com/x/admin");
        assert_eq!(sent[2], "http://a.example.com/x/test");
        assert_eq!(sent.last().unwrap(), "http://a.example.com/x/debug");

        // Base hit plus the two scripted fuzz hits.
        assert_eq!(store.len(), 3);
        let records = store.records();
        let admin = records
            .iter()
            .find(|r| r.url.ends_with("/admin"))
            .expect("admin hit recorded");
        assert!(admin.notes.contains("admin"));
    }

    #[tokio::test]
    async fn test_fuzz_respects_status_blacklist() {
        let probe = Arc::new(
            ScriptedProbe::new()
                .respond("http://a.example.com/x", 200, "")
                .respond("http://a.example.com/x/admin", 404, ""),
        );
        let (scanner, store, _rx) = scanner_with(Arc::clone(&probe));

        scanner
            .scan_list(vec!["http://a.example.com/x".to_string()])
            .await
            .unwrap();

        // admin was probed but its 404 response kept it out of the store.
        assert!(probe
            .sent
            .lock()
            .unwrap()
            .contains(&"http://a.example.com/x/admin".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_disabling_fuzz_stops_at_word_boundary() {
        let probe = Arc::new(ScriptedProbe::new());
        let (scanner, _store, _rx) = scanner_with(Arc::clone(&probe));

        scanner.scanning.store(true, Ordering::SeqCst);
        scanner.set_fuzz_enabled(false);
        let config = crate::config::FilterConfig::default();
        scanner.fuzz_attack("http://a.example.com/x", &config).await;

        assert!(probe.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_dictionary_is_a_no_op() {
        let probe = Arc::new(ScriptedProbe::new());
        let (scanner, _store, mut rx) = scanner_with(Arc::clone(&probe));

        scanner.scanning.store(true, Ordering::SeqCst);
        let config = crate::config::FilterConfig {
            fuzz_dictionary: Vec::new(),
            ..Default::default()
        };
        scanner.fuzz_attack("http://a.example.com/x", &config).await;

        assert!(probe.sent.lock().unwrap().is_empty());
        assert!(rx.try_recv().is_err());
    }
}
