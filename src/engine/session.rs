//! Per-transport session state.
//!
//! One [`Session`] lives for the lifetime of a transport instance. It is
//! populated as handshake and connect messages arrive, reset to "no
//! handshake, no loop" on disconnect, and torn down idempotently on
//! dispose. The handshake payload is published through a `watch` channel so
//! the receive path and the keep-alive loop both observe it without tearing,
//! and so the legacy connected path can await its arrival without polling.

use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::lock;
use crate::handshake::HandshakePayload;

/// Lifecycle states of a transport instance.
///
/// Any state may transition to `Disconnected` on explicit disconnect or a
/// fatal send/receive error. There is no automatic reconnection; that is an
/// owner concern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransportState {
    /// Constructed, no connection attempted.
    #[default]
    Idle,
    /// The underlying connection is being established.
    Connecting,
    /// Connected, waiting for the server's opened announcement.
    AwaitingHandshake,
    /// Handshake payload accepted.
    Handshaken,
    /// A namespace-connect frame is in flight.
    NamespaceConnecting,
    /// Namespace connection acknowledged; keep-alive may be running.
    Active,
    /// The underlying connection is closed.
    Disconnected,
}

pub(crate) struct Session {
    handshake: watch::Sender<Option<HandshakePayload>>,
    probe_sent_at: Mutex<Option<Instant>>,
    keep_alive: Mutex<Option<CancellationToken>>,
    state: Mutex<TransportState>,
}

impl Session {
    pub(crate) fn new() -> Self {
        Self {
            handshake: watch::Sender::new(None),
            probe_sent_at: Mutex::new(None),
            keep_alive: Mutex::new(None),
            state: Mutex::new(TransportState::Idle),
        }
    }

    /// Publish the accepted handshake payload.
    pub(crate) fn publish_handshake(&self, payload: HandshakePayload) {
        self.handshake.send_replace(Some(payload));
    }

    /// Snapshot of the accepted handshake payload, if any.
    pub(crate) fn handshake(&self) -> Option<HandshakePayload> {
        self.handshake.borrow().clone()
    }

    /// Subscribe to handshake publication.
    pub(crate) fn subscribe_handshake(&self) -> watch::Receiver<Option<HandshakePayload>> {
        self.handshake.subscribe()
    }

    /// Record the send time of the latest keep-alive probe.
    pub(crate) fn record_probe(&self, at: Instant) { *lock(&self.probe_sent_at) = Some(at); }

    /// Elapsed time since the latest recorded probe.
    pub(crate) fn elapsed_since_probe(&self) -> Option<Duration> {
        lock(&self.probe_sent_at).map(|at| at.elapsed())
    }

    /// Install a new keep-alive loop handle, cancelling any previous loop.
    ///
    /// At most one loop is live per transport instance.
    pub(crate) fn install_keep_alive(&self, token: CancellationToken) {
        if let Some(previous) = lock(&self.keep_alive).replace(token) {
            previous.cancel();
        }
    }

    /// Cancel the running keep-alive loop, if any.
    pub(crate) fn cancel_keep_alive(&self) {
        if let Some(token) = lock(&self.keep_alive).take() {
            token.cancel();
        }
    }

    pub(crate) fn state(&self) -> TransportState { *lock(&self.state) }

    pub(crate) fn set_state(&self, state: TransportState) { *lock(&self.state) = state; }

    /// Reset to "no handshake, no loop" after a disconnect.
    pub(crate) fn reset(&self) {
        self.cancel_keep_alive();
        self.handshake.send_replace(None);
        *lock(&self.probe_sent_at) = None;
        self.set_state(TransportState::Disconnected);
    }

    /// Release the keep-alive handle. Safe to call from any state, any
    /// number of times.
    pub(crate) fn dispose(&self) { self.cancel_keep_alive(); }
}
