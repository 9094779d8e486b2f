//! Discovery record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Verification state of a discovered URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    /// Not yet looked at by an operator.
    Unchecked,
    /// Currently being verified.
    Checking,
    /// Verification finished.
    Done,
}

impl Default for CheckStatus {
    fn default() -> Self {
        CheckStatus::Unchecked
    }
}

/// A confirmed or observed URL belonging to an in-scope root domain.
///
/// Created on first discovery and updated in place on rediscovery; records
/// are never deleted by the engine (deletion is a persistence-layer
/// operation). `discovered_at` is the first-seen time and is never
/// re-stamped; `last_checked_at` tracks the most recent transition to
/// [`CheckStatus::Done`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryRecord {
    /// Full URL as observed or probed.
    pub url: String,
    /// HTTP method.
    pub method: String,
    /// Lowercased host.
    pub host: String,
    /// Path component.
    pub path: String,
    /// Query string without the leading `?`, when present.
    pub query: Option<String>,
    /// Response status code; 0 when no response was observed.
    pub status_code: u16,
    /// Response body length in bytes; 0 when no response was observed.
    pub body_length: usize,
    /// HTML title, empty when absent.
    pub title: String,
    /// Resolved IP, empty when resolution failed.
    pub ip: String,
    /// Whether the resolved IP belongs to an internal network.
    pub is_internal: bool,
    /// Leading host label for hosts with three or more labels.
    pub subdomain: Option<String>,
    /// Verification state.
    pub check_status: CheckStatus,
    /// Free-form annotation (discovery source, fuzz word, brute code).
    pub notes: String,
    /// First-seen timestamp.
    pub discovered_at: DateTime<Utc>,
    /// Most recent verification-finished timestamp.
    pub last_checked_at: Option<DateTime<Utc>>,
    /// Raw request bytes, when captured from intercepted traffic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_request: Option<Vec<u8>>,
    /// Raw response bytes, when captured from intercepted traffic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<Vec<u8>>,
}

impl DiscoveryRecord {
    /// Creates a record with zeroed response fields.
    pub fn new(url: impl Into<String>, method: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            host: host.into(),
            path: "/".to_string(),
            query: None,
            status_code: 0,
            body_length: 0,
            title: String::new(),
            ip: String::new(),
            is_internal: false,
            subdomain: None,
            check_status: CheckStatus::Unchecked,
            notes: String::new(),
            discovered_at: Utc::now(),
            last_checked_at: None,
            raw_request: None,
            raw_response: None,
        }
    }

    /// Transitions the verification state, stamping `last_checked_at` on
    /// the transition to `Done`. `discovered_at` is left untouched.
    pub fn set_check_status(&mut self, status: CheckStatus) {
        self.check_status = status;
        if status == CheckStatus::Done {
            self.last_checked_at = Some(Utc::now());
        }
    }

    /// Folds a later observation of the same canonical URL into this
    /// record: non-zero and non-empty fields from the newer observation
    /// overwrite, everything else is kept.
    pub fn merge_observation(&mut self, newer: &DiscoveryRecord) {
        if newer.status_code != 0 {
            self.status_code = newer.status_code;
        }
        if newer.body_length != 0 {
            self.body_length = newer.body_length;
        }
        if !newer.title.is_empty() {
            self.title = newer.title.clone();
        }
        if !newer.ip.is_empty() {
            self.ip = newer.ip.clone();
            self.is_internal = newer.is_internal;
        }
        if newer.query.is_some() {
            self.query = newer.query.clone();
            self.url = newer.url.clone();
        }
        if !newer.notes.is_empty() {
            self.notes = newer.notes.clone();
        }
        if newer.raw_request.is_some() {
            self.raw_request = newer.raw_request.clone();
        }
        if newer.raw_response.is_some() {
            self.raw_response = newer.raw_response.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_zeroed_response_fields() {
        let record = DiscoveryRecord::new("http://h/p", "GET", "h");
        assert_eq!(record.status_code, 0);
        assert_eq!(record.body_length, 0);
        assert_eq!(record.title, "");
        assert_eq!(record.check_status, CheckStatus::Unchecked);
        assert!(record.last_checked_at.is_none());
    }

    #[test]
    fn test_done_stamps_last_checked_not_discovered() {
        let mut record = DiscoveryRecord::new("http://h/p", "GET", "h");
        let first_seen = record.discovered_at;

        record.set_check_status(CheckStatus::Checking);
        assert!(record.last_checked_at.is_none());

        record.set_check_status(CheckStatus::Done);
        assert!(record.last_checked_at.is_some());
        assert_eq!(record.discovered_at, first_seen);
    }

    #[test]
    fn test_merge_overwrites_only_populated_fields() {
        let mut record = DiscoveryRecord::new("http://h/p", "GET", "h");
        record.status_code = 200;
        record.title = "Original".to_string();

        let mut newer = DiscoveryRecord::new("http://h/p?x=1", "GET", "h");
        newer.query = Some("x=1".to_string());
        newer.body_length = 512;

        record.merge_observation(&newer);
        assert_eq!(record.status_code, 200); // newer had no status
        assert_eq!(record.title, "Original"); // newer had no title
        assert_eq!(record.body_length, 512);
        assert_eq!(record.query, Some("x=1".to_string()));
        assert_eq!(record.url, "http://h/p?x=1");
    }
}
