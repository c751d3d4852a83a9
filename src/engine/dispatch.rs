//! Inbound frame classification and routing.
//!
//! Raw frames flow in from the concrete connection: text frames are decoded
//! through the injected serializer and routed by message kind, binary frames
//! are paired with the oldest pending announcement. Every behavioural
//! difference between the two protocol generations lives in a guarded branch
//! here rather than in a second engine.

use std::time::Instant;

use bytes::Bytes;

use super::{lock, session::TransportState};
use crate::{
    engine::TransportEngine,
    error::TransportError,
    handshake::HandshakePayload,
    message::{InboundMessage, MessageKind},
    reassembly::AttachOutcome,
};

impl TransportEngine {
    /// Process one inbound text frame.
    ///
    /// Driven by the concrete connection. Frames that decode to nothing are
    /// ignored; messages announcing binary attachments are parked on the
    /// reassembly queue and delivered only once complete.
    pub async fn on_text_frame(&self, text: &str) {
        let Some(message) = self.serializer.deserialize(self.config.version, text) else {
            tracing::debug!(frame_len = text.len(), "text frame decoded to nothing; ignoring");
            return;
        };
        if message.pending_attachments() > 0 {
            lock(&self.pending).push(message);
            return;
        }
        match message.kind {
            MessageKind::Opened => self.handle_opened(message).await,
            MessageKind::Connected => self.handle_connected(message).await,
            MessageKind::Ping => self.handle_ping().await,
            MessageKind::Pong => self.handle_pong(message).await,
            _ => self.emit_received(message).await,
        }
    }

    /// Process one inbound raw binary frame.
    ///
    /// Driven by the concrete connection. A frame arriving while no
    /// announcement is pending signals protocol desynchronization and is
    /// dropped without surfacing an error.
    pub async fn on_binary_frame(&self, bytes: Bytes) {
        let outcome = lock(&self.pending).attach(bytes);
        match outcome {
            AttachOutcome::Completed(message) => self.emit_received(message).await,
            AttachOutcome::Pending => {}
            AttachOutcome::Unannounced => {
                tracing::debug!("binary frame arrived with no pending announcement; dropping");
            }
        }
    }

    /// Accept the handshake and, when the generation requires it, open the
    /// configured namespace. The announcement itself is then delivered to
    /// the owner; a malformed announcement is reported and suppressed.
    async fn handle_opened(&self, message: InboundMessage) {
        let text = message.payload.as_deref().unwrap_or_default();
        let payload = match HandshakePayload::parse(text) {
            Ok(payload) => payload,
            Err(error) => {
                self.emit_error(&TransportError::Handshake(error)).await;
                return;
            }
        };
        tracing::debug!(sid = %payload.sid, "handshake accepted");
        self.session.publish_handshake(payload);
        self.session.set_state(TransportState::Handshaken);
        if self.config.version.is_legacy() && self.config.namespace.is_empty() {
            // Root namespace is implicit on the legacy path.
            self.emit_received(message).await;
            return;
        }
        let frame = self.serializer.serialize_connect(
            &self.config.namespace,
            self.config.version,
            self.config.auth.as_deref(),
            &self.config.query,
        );
        self.session.set_state(TransportState::NamespaceConnecting);
        if let Err(error) = self.send_internal(&[frame]).await {
            self.emit_error(&error).await;
        }
        self.emit_received(message).await;
    }

    /// Route a namespace-connect acknowledgement.
    ///
    /// The legacy generation acknowledges before the handshake payload is
    /// guaranteed to have arrived, so the acknowledgement waits for it
    /// (bounded by the connection timeout), is stamped with the session id,
    /// and restarts the keep-alive loop on a namespace match. An
    /// acknowledgement for a different namespace than this transport
    /// represents is suppressed.
    async fn handle_connected(&self, mut message: InboundMessage) {
        if self.config.version.is_legacy() {
            let Some(payload) = self.await_handshake().await else {
                return;
            };
            message.sid = Some(payload.sid.clone());
            if message.namespace != self.config.namespace {
                tracing::debug!(
                    namespace = %message.namespace,
                    "connected acknowledgement for another namespace; suppressing",
                );
                return;
            }
            self.start_keep_alive(payload.keep_alive_interval(), payload.keep_alive_timeout());
            self.session.set_state(TransportState::Active);
        } else if message.namespace == self.config.namespace {
            self.session.set_state(TransportState::Active);
        }
        self.emit_received(message).await;
    }

    /// Wait until the handshake payload has been published.
    ///
    /// Returns `None` on timeout, after reporting exactly one
    /// [`TransportError::HandshakeTimeout`] to the owner.
    async fn await_handshake(&self) -> Option<HandshakePayload> {
        let mut handshake = self.session.subscribe_handshake();
        let wait = handshake.wait_for(|payload| payload.is_some());
        // Clone out of the watch guard immediately so the non-`Send` `Ref`
        // is dropped before any await point below.
        let outcome = tokio::time::timeout(self.config.connection_timeout, wait)
            .await
            .map(|result| result.map(|value| (*value).clone()));
        match outcome {
            Ok(Ok(value)) => value,
            // The publishing side lives in the session, so a closed channel
            // means the transport is being torn down; nothing to deliver.
            Ok(Err(_)) => None,
            Err(_) => {
                self.emit_error(&TransportError::HandshakeTimeout).await;
                None
            }
        }
    }

    /// Echo a server-initiated probe and surface a synthesized
    /// acknowledgement to the owner.
    async fn handle_ping(&self) {
        let probe_at = Instant::now();
        self.session.record_probe(probe_at);
        let echo = self.serializer.serialize_ping();
        if let Err(error) = self.send_internal(&[echo]).await {
            self.emit_error(&error).await;
            return;
        }
        let mut pong = self.serializer.new_message(MessageKind::Pong);
        pong.round_trip = Some(probe_at.elapsed());
        self.emit_received(pong).await;
    }

    /// Deliver a keep-alive acknowledgement, stamping the round-trip
    /// duration on the legacy path where the client initiated the probe.
    async fn handle_pong(&self, mut message: InboundMessage) {
        if self.config.version.is_legacy() {
            message.round_trip = self.session.elapsed_since_probe();
        }
        self.emit_received(message).await;
    }
}
