//! Error types for the transport engine.
//!
//! Propagation follows two rules: failures on reactive paths (keep-alive
//! probes, frames arriving from the connection) are routed to the owner's
//! error callback and never thrown across the frame-receive path, while
//! failures on caller-initiated operations are returned to that caller.

/// Boxed error type used for wrapped connection-level causes.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors emitted by the transport engine and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Required configuration was missing at construction.
    #[error("missing required configuration: {0}")]
    Construction(&'static str),
    /// The legacy connected acknowledgement waited past the connection
    /// timeout for the handshake payload.
    #[error("timed out waiting for the handshake payload")]
    HandshakeTimeout,
    /// The opened announcement could not be decoded.
    #[error("malformed handshake payload")]
    Handshake(#[source] serde_json::Error),
    /// The underlying connection could not be established or torn down.
    #[error("connection failed: {0}")]
    Connect(#[source] BoxError),
    /// The underlying connection rejected an outbound send.
    #[error("failed to send frames: {0}")]
    Send(#[source] BoxError),
    /// A keep-alive probe was not acknowledged within its deadline.
    #[error("keep-alive probe timed out")]
    ProbeTimeout,
    /// The operation was cancelled before completion.
    #[error("operation cancelled")]
    Cancelled,
}
