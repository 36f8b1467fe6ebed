// src/connection/guard.rs

//! Defines `ConnectionGuard`, an RAII guard for connection resource management.

use crate::core::metrics;
use tokio::sync::OwnedSemaphorePermit;
use tracing::debug;

/// An RAII guard to ensure connection resources are always cleaned up when a
/// connection handler's scope is exited.
pub struct ConnectionGuard {
    /// The unique identifier for the client session.
    pub(crate) session_id: u64,
    /// The printable address of the client.
    pub(crate) peer: String,
    /// The client slot taken from the server's `max_clients` budget, if any.
    _permit: Option<OwnedSemaphorePermit>,
}

impl ConnectionGuard {
    /// Creates a new `ConnectionGuard` and counts the client as connected.
    pub(crate) fn new(
        session_id: u64,
        peer: impl Into<String>,
        permit: Option<OwnedSemaphorePermit>,
    ) -> Self {
        metrics::CONNECTED_CLIENTS.inc();
        Self {
            session_id,
            peer: peer.into(),
            _permit: permit,
        }
    }
}

impl Drop for ConnectionGuard {
    /// Returns the client slot and updates the connection gauge.
    fn drop(&mut self) {
        metrics::CONNECTED_CLIENTS.dec();
        debug!(
            "ConnectionGuard dropping, cleaning up resources for session {} ({})",
            self.session_id, self.peer
        );
    }
}
