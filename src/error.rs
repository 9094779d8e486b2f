//! Error type definitions.
//!
//! This module defines the error types used throughout the engine. Each
//! component gets its own enum; orchestration code wraps them in `anyhow`.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error initializing the DNS resolver.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(String),
}

/// Error types for probe requests.
///
/// A probe failure is contained: the candidate produces no record and the
/// surrounding run continues.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The request could not be sent or the connection failed.
    #[error("Probe transport error for {url}: {source}")]
    Transport {
        /// Candidate URL being probed.
        url: String,
        /// Underlying client error.
        #[source]
        source: ReqwestError,
    },

    /// The response body could not be read.
    #[error("Probe body error for {url}: {source}")]
    Body {
        /// Candidate URL being probed.
        url: String,
        /// Underlying client error.
        #[source]
        source: ReqwestError,
    },

    /// The candidate URL could not be turned into a request.
    #[error("Invalid probe URL: {0}")]
    InvalidUrl(String),
}

/// Error types for record and configuration storage.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A record write failed.
    #[error("Store write error: {0}")]
    WriteError(String),

    /// The persisted configuration could not be serialized or parsed.
    #[error("Stored configuration error: {0}")]
    ConfigError(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_wraps_serde_failures() {
        let parse_error = serde_json::from_str::<crate::config::FilterConfig>("not json")
            .expect_err("invalid JSON must fail");
        let error = StoreError::from(parse_error);
        assert!(error.to_string().starts_with("Stored configuration error"));
    }

    #[test]
    fn test_probe_error_messages_name_the_url() {
        let error = ProbeError::InvalidUrl("http://bad url".to_string());
        assert!(error.to_string().contains("http://bad url"));
    }
}
