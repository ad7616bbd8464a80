//! The `TransportAdapter` publish seam and a `WebSocket` reference adapter.
//!
//! The tick driver hands each [`OutboundTick`] to a `TransportAdapter` at
//! tick end (§5, step 9). [`WsBroadcastAdapter`] fans that payload out to
//! every connected `WebSocket` client via a bounded
//! [`tokio::sync::broadcast`] channel -- a full channel applies
//! backpressure to the publishing task rather than buffering without
//! bound, matching the teacher's [`crate::state`]-module broadcast
//! pattern (renamed here from `AppState`/`TickBroadcast`).

use territory_types::OutboundTick;
use tokio::sync::broadcast;

use crate::error::ObserverError;

/// Capacity of the broadcast channel for outbound ticks.
///
/// A subscriber that falls behind by more than this many messages
/// receives a [`broadcast::error::RecvError::Lagged`] and resumes from
/// the newest tick rather than replaying every missed one.
const BROADCAST_CAPACITY: usize = 256;

/// Publishes outbound tick payloads to whatever transport a collaborator
/// provides (WebSocket, NATS, a test spy, ...).
pub trait TransportAdapter: Send + Sync {
    /// The error type returned by this adapter's publish operation.
    type Error: std::error::Error;

    /// Publish one tick's outbound payload.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if the adapter cannot accept the payload.
    fn publish(&self, payload: &OutboundTick) -> Result<(), Self::Error>;
}

/// `WebSocket` broadcast reference implementation of [`TransportAdapter`].
///
/// Holds the sending half of a broadcast channel; `WebSocket` handlers
/// subscribe to receive every tick published after they connect.
#[derive(Clone)]
pub struct WsBroadcastAdapter {
    tx: broadcast::Sender<OutboundTick>,
}

impl WsBroadcastAdapter {
    /// Create a fresh adapter with no subscribers yet.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { tx }
    }

    /// Subscribe to the outbound tick stream.
    ///
    /// Returns a receiver that yields every [`OutboundTick`] published
    /// after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<OutboundTick> {
        self.tx.subscribe()
    }
}

impl Default for WsBroadcastAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportAdapter for WsBroadcastAdapter {
    type Error = ObserverError;

    fn publish(&self, payload: &OutboundTick) -> Result<(), Self::Error> {
        // send returns Err only when there are zero receivers, which is
        // normal when no WebSocket client is currently connected.
        let _ = self.tx.send(payload.clone());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_tick(tick: u64) -> OutboundTick {
        OutboundTick { room_id: territory_types::RoomId::new(), tick, nations: Vec::new() }
    }

    #[test]
    fn a_subscriber_receives_a_published_tick() {
        let adapter = WsBroadcastAdapter::new();
        let mut rx = adapter.subscribe();
        adapter.publish(&sample_tick(1)).unwrap();
        let received = rx.try_recv().unwrap();
        assert_eq!(received.tick, 1);
    }

    #[test]
    fn publishing_with_no_subscribers_is_not_an_error() {
        let adapter = WsBroadcastAdapter::new();
        assert!(adapter.publish(&sample_tick(1)).is_ok());
    }
}
