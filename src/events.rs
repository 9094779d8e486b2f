//! Outward discovery event channel.
//!
//! The engine reports discoveries, progress, and errors as messages on a
//! bounded channel rather than invoking consumer callbacks in-process, so
//! slow consumers (persistence, presentation) cannot stall classification
//! or probing.

use std::collections::BTreeSet;

use log::warn;
use tokio::sync::mpsc;

use crate::record::DiscoveryRecord;

/// Events emitted by the discovery engine.
#[derive(Debug, Clone)]
pub enum DiscoveryEvent {
    /// A host was seen for the first time under a root domain.
    SubdomainDiscovered {
        /// The configured root domain the host matched.
        root_domain: String,
        /// The full host that was discovered.
        subdomain: String,
    },
    /// A new URL was discovered and recorded.
    UrlDiscovered(DiscoveryRecord),
    /// A new URL was discovered from intercepted traffic, with the raw
    /// request/response exchange attached.
    UrlDiscoveredWithExchange {
        /// The discovery record.
        record: DiscoveryRecord,
        /// Raw request bytes.
        raw_request: Vec<u8>,
        /// Raw response bytes.
        raw_response: Vec<u8>,
    },
    /// The operator replaced the root domain set.
    RootDomainsUpdated(BTreeSet<String>),
    /// Per-URL progress of an active scan run.
    ScanProgress {
        /// URLs processed so far.
        current: usize,
        /// Total URLs in the run.
        total: usize,
    },
    /// An active scan run finished.
    ScanComplete,
    /// A contained failure that the engine reported and survived.
    Error(String),
}

/// Sending half of the event channel.
///
/// Cloneable; one clone per producer (listener, scanner).
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::Sender<DiscoveryEvent>,
}

impl EventSink {
    /// Creates a sink and its consumer end with the given capacity.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<DiscoveryEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Emits an event from an async context.
    ///
    /// Tries a non-blocking send first; when the channel is full the send
    /// is awaited, providing backpressure against a slow consumer. A
    /// closed channel drops the event with a warning; the engine keeps
    /// running without a consumer.
    pub async fn emit(&self, event: DiscoveryEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                if self.tx.send(event).await.is_err() {
                    warn!("Event channel closed, discovery event dropped");
                }
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("Event channel closed, discovery event dropped");
            }
        }
    }

    /// Emits an event from the synchronous interception path.
    ///
    /// Never blocks: when the channel is full the event is dropped with a
    /// warning, keeping the traffic-interception caller cheap.
    pub fn emit_nonblocking(&self, event: DiscoveryEvent) {
        if let Err(e) = self.tx.try_send(event) {
            match e {
                mpsc::error::TrySendError::Full(_) => {
                    warn!("Event channel full, discovery event dropped");
                }
                mpsc::error::TrySendError::Closed(_) => {
                    warn!("Event channel closed, discovery event dropped");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_delivers_in_order() {
        let (sink, mut rx) = EventSink::channel(8);
        sink.emit(DiscoveryEvent::ScanProgress { current: 1, total: 2 })
            .await;
        sink.emit(DiscoveryEvent::ScanComplete).await;

        assert!(matches!(
            rx.recv().await,
            Some(DiscoveryEvent::ScanProgress { current: 1, total: 2 })
        ));
        assert!(matches!(rx.recv().await, Some(DiscoveryEvent::ScanComplete)));
    }

    #[tokio::test]
    async fn test_emit_nonblocking_drops_when_full() {
        let (sink, mut rx) = EventSink::channel(1);
        sink.emit_nonblocking(DiscoveryEvent::ScanComplete);
        // Channel is full; this one is dropped rather than blocking.
        sink.emit_nonblocking(DiscoveryEvent::Error("overflow".into()));

        assert!(matches!(rx.recv().await, Some(DiscoveryEvent::ScanComplete)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_emit_survives_closed_channel() {
        let (sink, rx) = EventSink::channel(1);
        drop(rx);
        // Must not panic or error out.
        sink.emit(DiscoveryEvent::ScanComplete).await;
        sink.emit_nonblocking(DiscoveryEvent::ScanComplete);
    }
}
