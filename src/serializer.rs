//! Wire-format capability injected into the transport engine.
//!
//! The engine is deliberately ignorant of the application wire format:
//! turning protocol text into typed messages and back is the job of a
//! [`Serializer`] supplied by the owner. The trait is object-safe so the
//! engine can hold it behind `Arc<dyn Serializer>`.

use crate::{
    connection::OutboundFrame,
    message::{InboundMessage, MessageKind},
    protocol::ProtocolVersion,
};

/// Serializes and deserializes protocol messages for one wire format.
pub trait Serializer: Send + Sync {
    /// Decode one inbound text frame.
    ///
    /// Returns `None` when the frame decodes to nothing. This is not an
    /// error: some encodings carry empty or heartbeat-only frames, and
    /// malformed-but-recognizable input is silently ignored by the engine
    /// rather than escalated.
    fn deserialize(&self, version: ProtocolVersion, text: &str) -> Option<InboundMessage>;

    /// Encode the namespace-connect frame sent after a handshake.
    ///
    /// `auth` and `query` are opaque pass-through values configured by the
    /// owner; an empty `namespace` addresses the default namespace.
    fn serialize_connect(
        &self,
        namespace: &str,
        version: ProtocolVersion,
        auth: Option<&str>,
        query: &[(String, String)],
    ) -> OutboundFrame;

    /// Encode a keep-alive probe frame.
    fn serialize_ping(&self) -> OutboundFrame;

    /// Construct an empty message of the given kind.
    ///
    /// Used by the engine for synthesized messages, e.g. the keep-alive
    /// acknowledgement it fabricates after echoing a server probe.
    fn new_message(&self, kind: MessageKind) -> InboundMessage { InboundMessage::new(kind) }
}
