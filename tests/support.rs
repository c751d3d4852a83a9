//! Shared fixtures for transport engine integration tests.

use std::{
    sync::{
        Arc,
        Mutex,
        MutexGuard,
        PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use sockwire::{
    DuplexConnection,
    InboundMessage,
    MessageKind,
    OutboundFrame,
    ProtocolVersion,
    ProxyConfig,
    Serializer,
    TransportBuilder,
    TransportEngine,
    TransportError,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_util::sync::CancellationToken;

/// Connection timeout applied to every harness engine.
pub const CONNECTION_TIMEOUT: Duration = Duration::from_millis(200);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock duplex connection recording everything the engine pushes into it.
#[derive(Default)]
pub struct MockConnection {
    sent: Mutex<Vec<OutboundFrame>>,
    headers: Mutex<Vec<(String, String)>>,
    proxy: Mutex<Option<ProxyConfig>>,
    stall: Mutex<Option<Duration>>,
    fail_sends: AtomicBool,
    connected: AtomicBool,
}

impl MockConnection {
    pub fn sent_frames(&self) -> Vec<OutboundFrame> { lock(&self.sent).clone() }

    pub fn sent_ping_count(&self) -> usize {
        lock(&self.sent)
            .iter()
            .filter(|frame| **frame == OutboundFrame::Text("ping".to_owned()))
            .count()
    }

    pub fn clear_sent(&self) { lock(&self.sent).clear(); }

    pub fn fail_sends(&self, fail: bool) { self.fail_sends.store(fail, Ordering::SeqCst); }

    /// Make every subsequent send sleep for `duration` before completing,
    /// honouring the passed cancellation token while it sleeps.
    pub fn stall_sends(&self, duration: Duration) { *lock(&self.stall) = Some(duration); }

    pub fn headers(&self) -> Vec<(String, String)> { lock(&self.headers).clone() }

    pub fn proxy(&self) -> Option<ProxyConfig> { lock(&self.proxy).clone() }

    pub fn is_connected(&self) -> bool { self.connected.load(Ordering::SeqCst) }
}

#[async_trait]
impl DuplexConnection for MockConnection {
    async fn connect(&self, _uri: &str, _cancel: CancellationToken) -> Result<(), TransportError> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self, _cancel: CancellationToken) -> Result<(), TransportError> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn send_frames(
        &self,
        frames: &[OutboundFrame],
        cancel: CancellationToken,
    ) -> Result<(), TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        let stall = *lock(&self.stall);
        if let Some(duration) = stall {
            tokio::select! {
                () = cancel.cancelled() => return Err(TransportError::Cancelled),
                () = tokio::time::sleep(duration) => {}
            }
        }
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(TransportError::Send("mock connection rejected the send".into()));
        }
        lock(&self.sent).extend_from_slice(frames);
        Ok(())
    }

    fn add_header(&self, key: &str, value: &str) {
        lock(&self.headers).push((key.to_owned(), value.to_owned()));
    }

    fn set_proxy(&self, proxy: ProxyConfig) { *lock(&self.proxy) = Some(proxy); }
}

/// Line-oriented wire serializer for tests.
///
/// Text frames use the format `kind|namespace|binary_count|payload`; the
/// namespace-connect frame serializes to `connect|namespace|auth|query`.
/// Unknown kinds decode to nothing, like a heartbeat-only frame.
pub struct LineSerializer;

impl Serializer for LineSerializer {
    fn deserialize(&self, _version: ProtocolVersion, text: &str) -> Option<InboundMessage> {
        let mut parts = text.splitn(4, '|');
        let kind = match parts.next()? {
            "opened" => MessageKind::Opened,
            "connected" => MessageKind::Connected,
            "ping" => MessageKind::Ping,
            "pong" => MessageKind::Pong,
            "event" => MessageKind::Event,
            "disconnected" => MessageKind::Disconnected,
            _ => return None,
        };
        let mut message = InboundMessage::new(kind);
        message.namespace = parts.next().unwrap_or_default().to_owned();
        message.binary_count = parts.next().and_then(|count| count.parse().ok()).unwrap_or(0);
        message.payload = parts
            .next()
            .filter(|payload| !payload.is_empty())
            .map(str::to_owned);
        Some(message)
    }

    fn serialize_connect(
        &self,
        namespace: &str,
        _version: ProtocolVersion,
        auth: Option<&str>,
        query: &[(String, String)],
    ) -> OutboundFrame {
        let query = query
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        OutboundFrame::Text(format!("connect|{namespace}|{}|{query}", auth.unwrap_or_default()))
    }

    fn serialize_ping(&self) -> OutboundFrame { OutboundFrame::Text("ping".to_owned()) }
}

/// An engine wired to a [`MockConnection`] with both owner callbacks
/// captured on channels.
pub struct Harness {
    pub engine: Arc<TransportEngine>,
    pub connection: Arc<MockConnection>,
    pub received: UnboundedReceiver<InboundMessage>,
    pub errors: UnboundedReceiver<String>,
}

/// Build a harness with default configuration.
pub fn harness(version: ProtocolVersion, namespace: &str) -> Harness {
    harness_with(version, namespace, |builder| builder)
}

/// Build a harness, customizing the builder before construction.
pub fn harness_with(
    version: ProtocolVersion,
    namespace: &str,
    customize: impl FnOnce(TransportBuilder) -> TransportBuilder,
) -> Harness {
    let connection = Arc::new(MockConnection::default());
    let (received_tx, received) = mpsc::unbounded_channel();
    let (error_tx, errors) = mpsc::unbounded_channel();
    let builder = TransportEngine::builder()
        .serializer(Arc::new(LineSerializer))
        .connection(Arc::clone(&connection) as Arc<dyn DuplexConnection>)
        .protocol_version(version)
        .namespace(namespace)
        .connection_timeout(CONNECTION_TIMEOUT)
        .on_received(Arc::new(move |message| {
            let _ = received_tx.send(message);
            Box::pin(async {})
        }))
        .on_error(Arc::new(move |error| {
            let _ = error_tx.send(error.to_string());
            Box::pin(async {})
        }));
    let engine = customize(builder).build().expect("engine should build");
    Harness {
        engine: Arc::new(engine),
        connection,
        received,
        errors,
    }
}

/// Drain everything currently buffered on a channel.
pub fn drain<T>(receiver: &mut UnboundedReceiver<T>) -> Vec<T> {
    let mut items = Vec::new();
    while let Ok(item) = receiver.try_recv() {
        items.push(item);
    }
    items
}
