//! Transport engine runtime: connection lifecycle and the outbound path.

use std::{
    fmt,
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio_util::sync::CancellationToken;

use super::{
    ErrorHandler,
    ReceivedHandler,
    TransportBuilder,
    session::{Session, TransportState},
};
use crate::{
    connection::{DuplexConnection, OutboundFrame, ProxyConfig},
    error::TransportError,
    handshake::HandshakePayload,
    message::InboundMessage,
    protocol::ProtocolVersion,
    reassembly::PendingQueue,
    serializer::Serializer,
};

pub(crate) struct EngineConfig {
    pub(crate) version: ProtocolVersion,
    pub(crate) namespace: String,
    pub(crate) connection_timeout: Duration,
    pub(crate) auth: Option<String>,
    pub(crate) query: Vec<(String, String)>,
}

/// Transport protocol engine.
///
/// The engine composes the handshake state machine, the keep-alive loop,
/// and the binary reassembly queue over an injected [`DuplexConnection`]
/// and [`Serializer`]. All methods take `&self`; interior state is
/// synchronised so a concrete connection can drive the frame entry points
/// ([`on_text_frame`](Self::on_text_frame),
/// [`on_binary_frame`](Self::on_binary_frame)) while the owner concurrently
/// sends.
///
/// The frame-receive path and the keep-alive loop may both send on the
/// shared connection; outbound sends are serialised through an internal
/// gate without stalling inbound dispatch.
pub struct TransportEngine {
    pub(crate) serializer: Arc<dyn Serializer>,
    pub(crate) connection: Arc<dyn DuplexConnection>,
    pub(crate) config: EngineConfig,
    pub(crate) session: Arc<Session>,
    pub(crate) pending: Mutex<PendingQueue>,
    pub(crate) send_gate: Arc<tokio::sync::Mutex<()>>,
    pub(crate) on_received: Option<ReceivedHandler>,
    pub(crate) on_error: Option<ErrorHandler>,
}

impl fmt::Debug for TransportEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportEngine")
            .field("version", &self.config.version)
            .field("namespace", &self.config.namespace)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl TransportEngine {
    /// Start building a new engine.
    #[must_use]
    pub fn builder() -> TransportBuilder { TransportBuilder::new() }

    /// Establish the underlying duplex connection.
    ///
    /// The handshake itself is not performed here; it happens reactively as
    /// frames arrive on the new connection.
    ///
    /// # Errors
    ///
    /// Returns the connection error when the underlying connection cannot
    /// be established or `cancel` fires first.
    pub async fn connect(
        &self,
        uri: &str,
        cancel: CancellationToken,
    ) -> Result<(), TransportError> {
        self.session.set_state(TransportState::Connecting);
        match self.connection.connect(uri, cancel).await {
            Ok(()) => {
                self.session.set_state(TransportState::AwaitingHandshake);
                Ok(())
            }
            Err(error) => {
                self.session.set_state(TransportState::Disconnected);
                Err(error)
            }
        }
    }

    /// Close the underlying connection.
    ///
    /// The keep-alive loop is cancelled first so no probe races the closing
    /// connection; the session is then reset to "no handshake, no loop".
    ///
    /// # Errors
    ///
    /// Returns the connection's teardown error, if any. The session is
    /// reset regardless.
    pub async fn disconnect(&self, cancel: CancellationToken) -> Result<(), TransportError> {
        self.session.cancel_keep_alive();
        let result = self.connection.disconnect(cancel).await;
        self.session.reset();
        result
    }

    /// Transmit one or more application-level frames, already serialized by
    /// the wire serializer.
    ///
    /// Frames are transmitted atomically from the caller's perspective:
    /// order is preserved and no other send interleaves with them.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Send`] when the underlying connection
    /// rejects the frames, or [`TransportError::Cancelled`] when `cancel`
    /// fires first. Caller-initiated send failures are returned here, not
    /// routed to the error callback.
    pub async fn send(
        &self,
        frames: &[OutboundFrame],
        cancel: CancellationToken,
    ) -> Result<(), TransportError> {
        let _gate = self.send_gate.lock().await;
        self.connection.send_frames(frames, cancel).await
    }

    /// Record a header for the underlying connection. Pass-through only.
    pub fn add_header(&self, key: &str, value: &str) { self.connection.add_header(key, value); }

    /// Route the underlying connection through a proxy. Pass-through only.
    pub fn set_proxy(&self, proxy: ProxyConfig) { self.connection.set_proxy(proxy); }

    /// Cancel and release the keep-alive loop, if one is running.
    ///
    /// Idempotent; never panics, even when called repeatedly or before any
    /// connection was established.
    pub fn dispose(&self) { self.session.dispose(); }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> TransportState { self.session.state() }

    /// The accepted handshake payload, if the handshake has completed.
    #[must_use]
    pub fn handshake(&self) -> Option<HandshakePayload> { self.session.handshake() }

    /// Send frames from a reactive path, serialised behind the send gate.
    ///
    /// Reactive sends carry no caller cancellation; failures are reported
    /// by the caller to the owner's error callback instead of propagating.
    pub(crate) async fn send_internal(
        &self,
        frames: &[OutboundFrame],
    ) -> Result<(), TransportError> {
        let _gate = self.send_gate.lock().await;
        self.connection
            .send_frames(frames, CancellationToken::new())
            .await
    }

    /// Deliver a fully formed message to the owner.
    pub(crate) async fn emit_received(&self, message: InboundMessage) {
        if let Some(handler) = &self.on_received {
            handler(message).await;
        }
    }

    /// Report a recoverable fault to the owner.
    pub(crate) async fn emit_error(&self, error: &TransportError) {
        if let Some(handler) = &self.on_error {
            handler(error).await;
        }
    }
}
