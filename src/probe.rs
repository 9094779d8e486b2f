//! Outbound HTTP probing.
//!
//! The probe client is the engine's only outbound network dependency, kept
//! behind a trait so scans can be driven by a scripted transport in tests.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ProbeError;

/// Result of a single probe request.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response body text.
    pub body: String,
}

impl ProbeResponse {
    /// Body length in bytes.
    pub fn body_length(&self) -> usize {
        self.body.len()
    }
}

/// Sends one HTTP request for a candidate URL.
///
/// Implementations must be cheap to share across workers; a failure means
/// "no record for this candidate", never a reason to stop a run.
#[async_trait]
pub trait HttpProbe: Send + Sync {
    /// Issues a GET request and returns the response status and body.
    async fn send(&self, url: &str) -> Result<ProbeResponse, ProbeError>;
}

/// Production probe backed by `reqwest`.
pub struct ReqwestProbe {
    client: Arc<reqwest::Client>,
}

impl ReqwestProbe {
    /// Wraps an initialized client.
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpProbe for ReqwestProbe {
    async fn send(&self, url: &str) -> Result<ProbeResponse, ProbeError> {
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|source| ProbeError::Transport {
                    url: url.to_string(),
                    source,
                })?;

        let status_code = response.status().as_u16();
        let body = response.text().await.map_err(|source| ProbeError::Body {
            url: url.to_string(),
            source,
        })?;

        Ok(ProbeResponse { status_code, body })
    }
}
