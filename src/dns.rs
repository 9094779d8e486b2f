//! IP resolution and internal-network classification.
//!
//! Resolution sits behind the [`IpResolver`] trait so the engine can be
//! exercised without touching the network; the production implementation
//! wraps a `hickory_resolver::TokioAsyncResolver`.

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use log::debug;

/// Resolves a hostname to an IP address string.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Returns the first resolved address, or `None` when resolution
    /// fails. Failures are classification data, not errors: the caller
    /// records an empty IP and `is_internal = false`.
    async fn resolve(&self, host: &str) -> Option<String>;
}

/// Production resolver backed by hickory DNS.
pub struct DnsIpResolver {
    resolver: Arc<TokioAsyncResolver>,
}

impl DnsIpResolver {
    /// Wraps an initialized resolver.
    pub fn new(resolver: Arc<TokioAsyncResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl IpResolver for DnsIpResolver {
    async fn resolve(&self, host: &str) -> Option<String> {
        match self.resolver.lookup_ip(host).await {
            Ok(response) => response.iter().next().map(|ip| ip.to_string()),
            Err(e) => {
                debug!("DNS resolution failed for {host}: {e}");
                None
            }
        }
    }
}

/// Resolver that never resolves anything. Useful when the engine runs
/// without network access and in tests.
#[derive(Debug, Default)]
pub struct NullIpResolver;

#[async_trait]
impl IpResolver for NullIpResolver {
    async fn resolve(&self, _host: &str) -> Option<String> {
        None
    }
}

/// Classifies a host: `(ip, is_internal)`.
///
/// Resolution failure yields an empty IP and `false`.
pub async fn classify_host(host: &str, resolver: &dyn IpResolver) -> (String, bool) {
    match resolver.resolve(host).await {
        Some(ip) => {
            let internal = is_internal_ip(&ip);
            (ip, internal)
        }
        None => (String::new(), false),
    }
}

/// Whether an IP address string belongs to an internal network.
///
/// Covers RFC 1918 ranges (10/8, 172.16/12, 192.168/16), loopback,
/// link-local (169.254/16, fe80::/10) and the IPv6 loopback.
pub fn is_internal_ip(ip: &str) -> bool {
    let Ok(addr) = ip.parse::<IpAddr>() else {
        return false;
    };
    match addr {
        IpAddr::V4(v4) => {
            let octets = v4.octets();
            v4.is_private()
                || v4.is_loopback()
                || (octets[0] == 169 && octets[1] == 254)
        }
        IpAddr::V6(v6) => {
            let segments = v6.segments();
            v6.is_loopback() || (segments[0] & 0xffc0) == 0xfe80
        }
    }
}
