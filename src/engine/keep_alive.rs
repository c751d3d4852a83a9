//! Client-initiated keep-alive probe loop.
//!
//! Once a namespace connection is acknowledged on the legacy path, the
//! engine spawns one probe loop per transport instance. Every interval it
//! sends a probe bounded by the server-assigned per-probe deadline, records
//! the send time, and notifies the owner that a probe went out. The first
//! failure is reported to the owner's error callback and terminates the
//! loop; a restart is driven only by a fresh successful namespace connect.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio_util::sync::CancellationToken;

use super::{ErrorHandler, ReceivedHandler, session::Session};
use crate::{
    connection::DuplexConnection,
    engine::TransportEngine,
    error::TransportError,
    message::MessageKind,
    serializer::Serializer,
};

impl TransportEngine {
    /// Spawn a new keep-alive loop, cancelling any previous one.
    pub(crate) fn start_keep_alive(&self, interval: Duration, probe_timeout: Duration) {
        let token = CancellationToken::new();
        self.session.install_keep_alive(token.clone());
        let task = KeepAliveTask {
            connection: Arc::clone(&self.connection),
            serializer: Arc::clone(&self.serializer),
            session: Arc::clone(&self.session),
            send_gate: Arc::clone(&self.send_gate),
            on_received: self.on_received.clone(),
            on_error: self.on_error.clone(),
            interval,
            probe_timeout,
            token,
        };
        tokio::spawn(task.run());
    }
}

struct KeepAliveTask {
    connection: Arc<dyn DuplexConnection>,
    serializer: Arc<dyn Serializer>,
    session: Arc<Session>,
    send_gate: Arc<tokio::sync::Mutex<()>>,
    on_received: Option<ReceivedHandler>,
    on_error: Option<ErrorHandler>,
    interval: Duration,
    probe_timeout: Duration,
    token: CancellationToken,
}

impl KeepAliveTask {
    async fn run(self) {
        loop {
            tokio::select! {
                () = self.token.cancelled() => break,
                () = tokio::time::sleep(self.interval) => {}
            }
            match self.send_probe().await {
                Ok(sent_at) => {
                    self.session.record_probe(sent_at);
                    let probe = self.serializer.new_message(MessageKind::Ping);
                    if let Some(handler) = &self.on_received {
                        handler(probe).await;
                    }
                }
                Err(error) => {
                    if matches!(error, TransportError::Cancelled) && self.token.is_cancelled() {
                        break;
                    }
                    tracing::warn!(%error, "keep-alive probe failed; stopping loop");
                    if let Some(handler) = &self.on_error {
                        handler(&error).await;
                    }
                    break;
                }
            }
        }
    }

    /// Send one probe bounded by the per-probe deadline.
    ///
    /// The deadline covers the whole probe, including time spent queued
    /// behind the send gate. It is a child scope of the loop's own
    /// cancellation, so cancelling the loop also aborts an in-flight probe.
    async fn send_probe(&self) -> Result<Instant, TransportError> {
        let frame = self.serializer.serialize_ping();
        let deadline = self.token.child_token();
        let send_token = deadline.clone();
        let probe = async {
            let _gate = self.send_gate.lock().await;
            self.connection.send_frames(&[frame], send_token).await
        };
        match tokio::time::timeout(self.probe_timeout, probe).await {
            Ok(Ok(())) => Ok(Instant::now()),
            Ok(Err(error)) => Err(error),
            Err(_) => {
                deadline.cancel();
                Err(TransportError::ProbeTimeout)
            }
        }
    }
}
