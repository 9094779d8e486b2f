//! Root-domain matching.
//!
//! Decides whether a host belongs to one of the operator-configured root
//! domains. Matching is literal suffix matching: a host matches root `r`
//! iff it equals `r` or ends with `".{r}"`, so `evilrootdomain.com` never
//! matches root `rootdomain.com`.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

/// Normalizes a domain for matching: trims whitespace and lowercases.
///
/// Returns `None` for entries that are empty after trimming.
pub fn normalize_domain(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Finds the root domain a host belongs to, if any.
///
/// The host is normalized before comparison. When several configured roots
/// match (one being a suffix of another, e.g. `b.com` and `a.b.com`), the
/// longest match wins so attribution is deterministic.
///
/// Pure function: no I/O, no side effects.
pub fn match_root_domain(host: &str, roots: &BTreeSet<String>) -> Option<String> {
    let host = host.trim().to_lowercase();
    if host.is_empty() {
        return None;
    }

    let mut best: Option<&str> = None;
    for root in roots {
        let matches = host == *root || host.ends_with(&format!(".{root}"));
        if matches && best.map_or(true, |b| root.len() > b.len()) {
            best = Some(root);
        }
    }
    best.map(str::to_string)
}

/// Operator-configured root domains behind a whole-value snapshot.
///
/// `replace` swaps the entire set atomically; concurrent matcher calls see
/// either the old or the new set, never a partial update.
#[derive(Debug, Default)]
pub struct RootDomainSet {
    inner: RwLock<Arc<BTreeSet<String>>>,
}

impl RootDomainSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the set wholesale with the normalized contents of `domains`.
    ///
    /// Empty entries are dropped. Returns the new snapshot.
    pub fn replace<I, S>(&self, domains: I) -> Arc<BTreeSet<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let next: BTreeSet<String> = domains
            .into_iter()
            .filter_map(|d| normalize_domain(d.as_ref()))
            .collect();
        let next = Arc::new(next);
        match self.inner.write() {
            Ok(mut guard) => *guard = Arc::clone(&next),
            Err(poisoned) => *poisoned.into_inner() = Arc::clone(&next),
        }
        next
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<BTreeSet<String>> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }
}
