//! Short-link brute-force enumeration.
//!
//! Generates every code over the configured charset from length 1 up to
//! the configured maximum, shortest first, and probes each appended to a
//! base URL. Generation is an iterative odometer over charset indices, so
//! memory use is constant regardless of how many combinations exist.

use log::{info, warn};
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::analyze::build_candidate_url;
use crate::config::BRUTE_FORCE_PROBE_DELAY;
use crate::events::DiscoveryEvent;

use super::ActiveScanner;
use std::sync::Arc;

/// Iterator over short-link codes.
///
/// Yields codes in ascending length, and within a length in charset order
/// with the leftmost position most significant: for charset `ab` and
/// maximum length 2 the sequence is `a, b, aa, ab, ba, bb`.
pub struct ShortLinkGenerator {
    charset: Vec<char>,
    max_length: usize,
    // Odometer digits, one charset index per output position. Empty until
    // the first call to `next`.
    digits: Vec<usize>,
    exhausted: bool,
}

impl ShortLinkGenerator {
    /// Creates a generator for codes of length 1 through `max_length`.
    ///
    /// An empty charset or a zero maximum yields nothing.
    pub fn new(charset: &str, max_length: usize) -> Self {
        let charset: Vec<char> = charset.chars().collect();
        let exhausted = charset.is_empty() || max_length == 0;
        Self {
            charset,
            max_length,
            digits: Vec::new(),
            exhausted,
        }
    }

    fn advance(&mut self) {
        // Increment the rightmost digit, carrying leftward; when every
        // position wraps, grow to the next length.
        for position in (0..self.digits.len()).rev() {
            self.digits[position] += 1;
            if self.digits[position] < self.charset.len() {
                return;
            }
            self.digits[position] = 0;
        }
        if self.digits.len() < self.max_length {
            self.digits.push(0);
        } else {
            self.exhausted = true;
        }
    }
}

impl Iterator for ShortLinkGenerator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.exhausted {
            return None;
        }
        if self.digits.is_empty() {
            self.digits.push(0);
        } else {
            self.advance();
            if self.exhausted {
                return None;
            }
        }
        Some(self.digits.iter().map(|&i| self.charset[i]).collect())
    }
}

/// Total number of codes for a charset size and maximum length, saturating
/// at `u128::MAX`.
pub fn combination_count(charset_len: usize, max_length: usize) -> u128 {
    let base = charset_len as u128;
    let mut total = 0u128;
    let mut per_length = 1u128;
    for _ in 0..max_length {
        per_length = per_length.saturating_mul(base);
        total = total.saturating_add(per_length);
    }
    total
}

impl ActiveScanner {
    /// Starts a short-link enumeration against `base_url` on a background
    /// task.
    ///
    /// The run is skipped entirely when the filter configuration has the
    /// short-link toggle off. The combination count is estimated up front;
    /// a configuration whose space exceeds the cap is rejected with an
    /// error event before any probe is sent. Disabling brute-force
    /// enumeration cancels a running enumeration at the next candidate
    /// boundary.
    pub fn brute_force(self: &Arc<Self>, base_url: String) -> JoinHandle<()> {
        let scanner = Arc::clone(self);
        tokio::spawn(async move {
            let config = scanner.scan_config().await;
            if !config.short_link_brute_enabled {
                info!("Short-link enumeration is disabled in the filter configuration");
                return;
            }
            let charset_len = config.short_link_charset.chars().count();
            let space = combination_count(charset_len, config.short_link_max_length);
            if space > scanner.max_combinations() {
                warn!(
                    "Refusing short-link enumeration of {space} combinations \
                     (cap {})",
                    scanner.max_combinations()
                );
                scanner
                    .sink()
                    .emit(DiscoveryEvent::Error(format!(
                        "short-link space of {space} combinations exceeds the cap of {}",
                        scanner.max_combinations()
                    )))
                    .await;
                return;
            }

            let permit = match scanner.pool().clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return,
            };
            info!("Starting short-link enumeration of {space} codes against {base_url}");

            let mut hits = 0usize;
            let generator =
                ShortLinkGenerator::new(&config.short_link_charset, config.short_link_max_length);
            for code in generator {
                if !scanner.brute_force_allowed() {
                    info!("Short-link enumeration cancelled at code {code}");
                    break;
                }

                let candidate = build_candidate_url(&base_url, &code);
                let notes = format!("short-link candidate \"{code}\"");
                if scanner
                    .probe_candidate(&candidate, &config, &notes)
                    .await
                    .is_some()
                {
                    hits += 1;
                }
                sleep(BRUTE_FORCE_PROBE_DELAY).await;
            }

            drop(permit);
            info!("Short-link enumeration against {base_url} finished with {hits} hits");
        })
    }
}
