//! Transport protocol engine.
//!
//! The engine owns the handshake/keep-alive state machine, the legacy
//! protocol compatibility shim, and the binary reassembly queue. It receives
//! raw frames from a concrete [`DuplexConnection`](crate::connection::DuplexConnection),
//! classifies them, and forwards fully formed messages to the owning client
//! through the callbacks configured on the builder. Outbound application
//! messages are accepted pre-serialized and transmitted in order.

use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{error::TransportError, message::InboundMessage};

mod builder;
mod dispatch;
mod keep_alive;
mod runtime;
mod session;

pub use builder::TransportBuilder;
pub use runtime::TransportEngine;
pub use session::TransportState;

/// A boxed future that is `Send` with a specified lifetime.
///
/// This type alias reduces verbosity in handler type signatures.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Handler invoked for every fully formed deliverable message.
///
/// The engine may emit more than one message per inbound frame (for example
/// a synthesized keep-alive acknowledgement after echoing a server probe).
/// The handler must not block the engine for longer than it itself takes;
/// owners are responsible for offloading long work.
pub type ReceivedHandler = Arc<dyn Fn(InboundMessage) -> BoxFuture<'static, ()> + Send + Sync>;

/// Handler invoked for every recoverable fault.
///
/// Send failures on reactive paths, keep-alive probe failures, and handshake
/// timeouts are reported here rather than thrown across the frame-receive
/// path.
pub type ErrorHandler =
    Arc<dyn for<'a> Fn(&'a TransportError) -> BoxFuture<'a, ()> + Send + Sync>;

/// Acquire a std mutex, recovering the guard if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
