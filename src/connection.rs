//! Duplex connection capability implemented by concrete wire mechanisms.
//!
//! The engine abstracts over how bytes reach the peer: a persistent socket
//! and an HTTP long-polling loop are both modelled as implementations of
//! [`DuplexConnection`]. Implementations feed inbound frames back into the
//! engine through [`TransportEngine::on_text_frame`] and
//! [`TransportEngine::on_binary_frame`].
//!
//! [`TransportEngine::on_text_frame`]: crate::engine::TransportEngine::on_text_frame
//! [`TransportEngine::on_binary_frame`]: crate::engine::TransportEngine::on_binary_frame

use async_trait::async_trait;
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use crate::error::TransportError;

/// A single outbound wire frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundFrame {
    /// Protocol text frame.
    Text(String),
    /// Raw binary attachment frame.
    Binary(Bytes),
}

/// Proxy settings forwarded verbatim to the concrete connection.
///
/// The engine attaches no protocol semantics to these values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Proxy endpoint, e.g. `http://127.0.0.1:8080`.
    pub uri: String,
    /// Optional proxy username.
    pub username: Option<String>,
    /// Optional proxy password.
    pub password: Option<String>,
}

/// Capability implemented by the concrete transports that carry frames for
/// a [`TransportEngine`](crate::engine::TransportEngine).
///
/// Cancellation tokens are first-class values passed down by the caller,
/// never ambient state; implementations must abort the operation promptly
/// when the token fires.
#[async_trait]
pub trait DuplexConnection: Send + Sync {
    /// Establish the underlying connection to `uri`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connect`] when the connection cannot be
    /// established, or [`TransportError::Cancelled`] when `cancel` fires
    /// first.
    async fn connect(&self, uri: &str, cancel: CancellationToken) -> Result<(), TransportError>;

    /// Close the underlying connection.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connect`] when teardown fails in a way the
    /// owner should know about.
    async fn disconnect(&self, cancel: CancellationToken) -> Result<(), TransportError>;

    /// Transmit `frames` in order on the open connection.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Send`] when the connection rejects the
    /// frames, or [`TransportError::Cancelled`] when `cancel` fires before
    /// transmission completes.
    async fn send_frames(
        &self,
        frames: &[OutboundFrame],
        cancel: CancellationToken,
    ) -> Result<(), TransportError>;

    /// Record a header to send when establishing the connection.
    fn add_header(&self, key: &str, value: &str);

    /// Route the connection through a proxy.
    fn set_proxy(&self, proxy: ProxyConfig);
}
