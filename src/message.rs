//! Typed inbound messages exchanged between the wire serializer and the
//! engine.
//!
//! [`InboundMessage`] is a plain data carrier: the injected serializer
//! constructs one per decoded text frame, and the engine annotates it
//! (session id, round-trip duration, binary attachments) before handing it
//! to the owner. A message announcing binary attachments is never delivered
//! until every announced attachment has arrived.

use std::time::Duration;

use bytes::Bytes;

/// Kind of a decoded inbound message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// The server's initial handshake announcement.
    Opened,
    /// Acknowledgement of a namespace connection.
    Connected,
    /// Keep-alive probe.
    Ping,
    /// Keep-alive acknowledgement.
    Pong,
    /// Application message carrying a payload.
    Event,
    /// Acknowledgement of an application message.
    Ack,
    /// Notice that a namespace was disconnected.
    Disconnected,
    /// Error reported by the server.
    Error,
}

/// A decoded inbound message.
///
/// Produced by the injected [`Serializer`](crate::serializer::Serializer);
/// fields are deliberately public because the serializer lives outside this
/// crate. The engine maintains the invariant that
/// `attachments.len() <= binary_count` holds until the message is complete
/// and delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    /// Message kind used for dispatch.
    pub kind: MessageKind,
    /// Namespace tag; empty means the default namespace.
    pub namespace: String,
    /// Session identifier, stamped by the engine on the legacy connected
    /// path.
    pub sid: Option<String>,
    /// Announced number of binary attachments that follow as raw frames.
    pub binary_count: usize,
    /// Attachments received so far, in arrival order.
    pub attachments: Vec<Bytes>,
    /// Round-trip duration, stamped by the engine for keep-alive
    /// acknowledgements. Never set by the serializer.
    pub round_trip: Option<Duration>,
    /// Text payload, when the frame carried one.
    pub payload: Option<String>,
}

impl InboundMessage {
    /// Construct an empty message of the given kind.
    #[must_use]
    pub fn new(kind: MessageKind) -> Self {
        Self {
            kind,
            namespace: String::new(),
            sid: None,
            binary_count: 0,
            attachments: Vec::new(),
            round_trip: None,
            payload: None,
        }
    }

    /// Whether every announced binary attachment has arrived.
    #[must_use]
    pub fn is_complete(&self) -> bool { self.attachments.len() >= self.binary_count }

    /// Number of announced attachments still outstanding.
    #[must_use]
    pub fn pending_attachments(&self) -> usize {
        self.binary_count.saturating_sub(self.attachments.len())
    }
}
