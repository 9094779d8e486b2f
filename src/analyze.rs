//! URL string utilities.
//!
//! Host extraction here deliberately works on the raw string rather than a
//! parsed `url::Url`: intercepted traffic can carry request URLs that a
//! strict parser rejects, and a candidate with no recoverable host is
//! simply discarded. Path and query extraction for record construction use
//! the `url` crate.

use log::warn;
use scraper::{Html, Selector};

use crate::config::MAX_URL_LENGTH;

/// Extracts the host from a URL string.
///
/// Strips an `http://`/`https://` prefix, cuts at the first `/` or `?`,
/// then removes a trailing `:port` unless the last colon sits inside an
/// IPv6 bracket literal. The result is lowercased and trimmed.
///
/// Returns `None` when no non-empty host remains.
pub fn extract_host(url: &str) -> Option<String> {
    let mut rest = url;
    if let Some(stripped) = rest.strip_prefix("http://") {
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix("https://") {
        rest = stripped;
    }

    if let Some(pos) = rest.find('/') {
        rest = &rest[..pos];
    }
    if let Some(pos) = rest.find('?') {
        rest = &rest[..pos];
    }

    // A colon after the closing bracket (or with no bracket at all) is a
    // port separator; a colon inside `[...]` is part of an IPv6 literal.
    if let Some(colon) = rest.rfind(':') {
        let bracket = rest.rfind(']').map_or(-1_isize, |p| p as isize);
        if colon as isize > bracket {
            rest = &rest[..colon];
        }
    }

    let host = rest.trim().to_lowercase();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Extracts the path component of a URL, defaulting to `/`.
pub fn extract_path(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let path = parsed.path();
            if path.is_empty() {
                "/".to_string()
            } else {
                path.to_string()
            }
        }
        Err(_) => "/".to_string(),
    }
}

/// Extracts the query string of a URL, without the leading `?`.
pub fn extract_query(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.query().map(str::to_string))
}

/// Extracts the leading label of a host with at least three labels
/// (`www.example.com` -> `www`); hosts with fewer labels have no
/// subdomain.
pub fn extract_subdomain(host: &str) -> Option<String> {
    let parts: Vec<&str> = host.split('.').collect();
    if parts.len() >= 3 {
        Some(parts[0].to_string())
    } else {
        None
    }
}

/// Joins a base URL and a path segment, inserting a `/` only when the base
/// does not already end with one.
pub fn build_candidate_url(base: &str, segment: &str) -> String {
    if base.ends_with('/') {
        format!("{base}{segment}")
    } else {
        format!("{base}/{segment}")
    }
}

/// Whether the URL uses the https scheme.
pub fn is_https(url: &str) -> bool {
    url.to_lowercase().starts_with("https://")
}

/// Validates and normalizes an operator-supplied URL.
///
/// Adds an `https://` prefix if missing, rejects over-long input and
/// non-http(s) schemes. Logs a warning and returns `None` for anything
/// that should not be probed.
pub fn validate_and_normalize_url(url: &str) -> Option<String> {
    if url.len() > MAX_URL_LENGTH {
        warn!(
            "Skipping URL exceeding maximum length ({} > {})",
            url.len(),
            MAX_URL_LENGTH
        );
        return None;
    }

    let normalized = if !url.starts_with("http://") && !url.starts_with("https://") {
        format!("https://{url}")
    } else {
        url.to_string()
    };

    if normalized.len() > MAX_URL_LENGTH {
        warn!(
            "Skipping normalized URL exceeding maximum length ({} > {})",
            normalized.len(),
            MAX_URL_LENGTH
        );
        return None;
    }

    match url::Url::parse(&normalized) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" => Some(normalized),
            _ => {
                warn!("Skipping unsupported scheme for URL: {url}");
                None
            }
        },
        Err(_) => {
            warn!("Skipping invalid URL: {url}");
            None
        }
    }
}

/// Extracts the `<title>` text from an HTML body.
///
/// Returns an empty string when the body has no title or is not HTML.
pub fn extract_title(body: &str) -> String {
    if body.trim().is_empty() {
        return String::new();
    }
    let document = Html::parse_document(body);
    let selector = match Selector::parse("title") {
        Ok(selector) => selector,
        Err(_) => return String::new(),
    };
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}
