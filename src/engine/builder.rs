//! Builder for [`TransportEngine`].

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use super::{
    ErrorHandler,
    ReceivedHandler,
    runtime::{EngineConfig, TransportEngine},
    session::Session,
};
use crate::{
    connection::DuplexConnection,
    error::TransportError,
    protocol::ProtocolVersion,
    reassembly::PendingQueue,
    serializer::Serializer,
};

const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(20);

/// Builder for [`TransportEngine`].
///
/// The serializer and the duplex connection are required; everything else
/// has a default. Protocol version defaults to the current generation, the
/// namespace to the default namespace, and the connection timeout to 20
/// seconds.
#[must_use]
pub struct TransportBuilder {
    serializer: Option<Arc<dyn Serializer>>,
    connection: Option<Arc<dyn DuplexConnection>>,
    version: ProtocolVersion,
    namespace: String,
    connection_timeout: Duration,
    auth: Option<String>,
    query: Vec<(String, String)>,
    on_received: Option<ReceivedHandler>,
    on_error: Option<ErrorHandler>,
}

impl TransportBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            serializer: None,
            connection: None,
            version: ProtocolVersion::default(),
            namespace: String::new(),
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            auth: None,
            query: Vec::new(),
            on_received: None,
            on_error: None,
        }
    }

    /// Set the wire serializer capability.
    pub fn serializer(mut self, serializer: Arc<dyn Serializer>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    /// Set the underlying duplex connection.
    pub fn connection(mut self, connection: Arc<dyn DuplexConnection>) -> Self {
        self.connection = Some(connection);
        self
    }

    /// Select the protocol generation spoken with the peer.
    pub fn protocol_version(mut self, version: ProtocolVersion) -> Self {
        self.version = version;
        self
    }

    /// Set the target namespace. Empty means the default namespace.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Bound the legacy connected path's wait for the handshake payload.
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Opaque auth payload forwarded in the namespace-connect frame.
    pub fn auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    /// Append an opaque query parameter forwarded in the namespace-connect
    /// frame.
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Register the callback fired for every fully formed message.
    pub fn on_received(mut self, handler: ReceivedHandler) -> Self {
        self.on_received = Some(handler);
        self
    }

    /// Register the callback fired for every recoverable fault.
    pub fn on_error(mut self, handler: ErrorHandler) -> Self {
        self.on_error = Some(handler);
        self
    }

    /// Construct the engine.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Construction`] when the serializer or the
    /// connection was not supplied.
    pub fn build(self) -> Result<TransportEngine, TransportError> {
        let serializer = self
            .serializer
            .ok_or(TransportError::Construction("serializer"))?;
        let connection = self
            .connection
            .ok_or(TransportError::Construction("connection"))?;
        Ok(TransportEngine {
            serializer,
            connection,
            config: EngineConfig {
                version: self.version,
                namespace: self.namespace,
                connection_timeout: self.connection_timeout,
                auth: self.auth,
                query: self.query,
            },
            session: Arc::new(Session::new()),
            pending: Mutex::new(PendingQueue::new()),
            send_gate: Arc::new(tokio::sync::Mutex::new(())),
            on_received: self.on_received,
            on_error: self.on_error,
        })
    }
}

impl Default for TransportBuilder {
    fn default() -> Self { Self::new() }
}
