#![doc(html_root_url = "https://docs.rs/sockwire/latest")]
//! Transport-layer engine for real-time messaging clients.
//!
//! This crate speaks a text/binary framed protocol layered over a duplex
//! connection: handshake, keep-alive, namespace-scoped connect, and
//! out-of-order binary attachment reassembly. Received application messages
//! are surfaced to a higher layer through owner-supplied callbacks while the
//! concrete wire mechanism (persistent socket, long polling) stays behind
//! the [`DuplexConnection`] capability and the wire format behind the
//! injected [`Serializer`].
//!
//! Two incompatible protocol generations are supported through one code
//! path; see [`ProtocolVersion`].

pub mod connection;
pub mod engine;
pub mod error;
pub mod handshake;
pub mod message;
pub mod protocol;
pub mod reassembly;
pub mod serializer;

pub use connection::{DuplexConnection, OutboundFrame, ProxyConfig};
pub use engine::{
    BoxFuture,
    ErrorHandler,
    ReceivedHandler,
    TransportBuilder,
    TransportEngine,
    TransportState,
};
pub use error::{BoxError, TransportError};
pub use handshake::HandshakePayload;
pub use message::{InboundMessage, MessageKind};
pub use protocol::ProtocolVersion;
pub use reassembly::{AttachOutcome, PendingQueue};
pub use serializer::Serializer;
