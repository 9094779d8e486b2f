//! Deduplication of semantically identical URLs.
//!
//! Canonical identity is the URL with its query string stripped; path
//! differences remain distinct. The processed set guarantees at-most-once
//! handling: among concurrent claimants of the same canonical URL, exactly
//! one receives `true`.

use std::collections::HashSet;
use std::sync::Mutex;

/// Strips everything from (and including) the first `?` onward.
///
/// Idempotent: canonicalizing a canonical URL is a no-op.
pub fn canonical_url(url: &str) -> &str {
    match url.find('?') {
        Some(pos) => &url[..pos],
        None => url,
    }
}

/// Concurrent set of canonical URLs already processed in this session.
///
/// Claims are permanent for the lifetime of the session even when later
/// record construction fails; `clear` is the operator-triggered reset that
/// bounds memory.
#[derive(Debug, Default)]
pub struct ProcessedSet {
    inner: Mutex<HashSet<String>>,
}

impl ProcessedSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to claim a URL. Returns `true` iff this call is the first
    /// claimant of its canonical form.
    pub fn try_claim(&self, url: &str) -> bool {
        let canonical = canonical_url(url);
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.insert(canonical.to_string())
    }

    /// Resets the set. Already-emitted discoveries are not resurrected;
    /// their records live downstream of the engine.
    pub fn clear(&self) {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.clear();
    }

    /// Number of claimed canonical URLs.
    pub fn len(&self) -> usize {
        match self.inner.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Whether no URL has been claimed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
