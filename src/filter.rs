//! Candidate filter pipeline.
//!
//! Sequential rule chain applied to every candidate discovery:
//! host blacklist, then file-extension blacklist, then status-code
//! blacklist. Each stage short-circuits on first match. Empty or missing
//! configuration rejects nothing.

use log::debug;

use crate::config::FilterConfig;

/// Runs the full pipeline. Returns `true` when the candidate must be
/// rejected.
///
/// The status-code stage is only evaluated when a response status is
/// available; a candidate without one passes that stage.
pub fn should_reject(
    url: &str,
    host: &str,
    status_code: Option<u16>,
    config: &FilterConfig,
) -> bool {
    if is_host_blacklisted(host, config) {
        return true;
    }
    if is_extension_blacklisted(url, config) {
        return true;
    }
    if let Some(status) = status_code {
        if is_status_blacklisted(status, config) {
            return true;
        }
    }
    false
}

/// Host blacklist stage: the host equals or is a subdomain of a
/// blacklisted domain (same suffix rule as root-domain matching).
pub fn is_host_blacklisted(host: &str, config: &FilterConfig) -> bool {
    let host = host.to_lowercase();
    for entry in &config.domain_blacklist {
        let entry = entry.trim().to_lowercase();
        if entry.is_empty() {
            continue;
        }
        if host == entry || host.ends_with(&format!(".{entry}")) {
            debug!("host {host} rejected by domain blacklist entry {entry}");
            return true;
        }
    }
    false
}

/// Extension blacklist stage: the file extension derived from the URL path
/// matches a blacklisted extension (case-insensitive).
pub fn is_extension_blacklisted(url: &str, config: &FilterConfig) -> bool {
    let Some(extension) = extract_file_extension(url) else {
        return false;
    };
    for entry in &config.extension_blacklist {
        if entry.trim().eq_ignore_ascii_case(&extension) {
            debug!("url {url} rejected by extension blacklist ({extension})");
            return true;
        }
    }
    false
}

/// Status-code blacklist stage.
pub fn is_status_blacklisted(status_code: u16, config: &FilterConfig) -> bool {
    config.status_code_blacklist.contains(&status_code)
}

/// Extracts the file extension from a URL: the substring after the last
/// `.` that occurs after the last `/`, ignoring query string and fragment.
///
/// Returns `None` when there is no such dot, or when the dot is the final
/// character (a trailing dot names no extension).
pub fn extract_file_extension(url: &str) -> Option<String> {
    let mut path = url;
    if let Some(pos) = path.find('?') {
        path = &path[..pos];
    }
    if let Some(pos) = path.find('#') {
        path = &path[..pos];
    }

    let last_dot = path.rfind('.')?;
    let last_slash = path.rfind('/').unwrap_or(0);
    if last_dot > last_slash && last_dot < path.len() - 1 {
        Some(path[last_dot + 1..].to_lowercase())
    } else {
        None
    }
}
