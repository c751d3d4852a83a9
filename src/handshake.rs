//! Handshake payload announced by the server when a session opens.

use std::time::Duration;

use serde::Deserialize;

/// Parsed representation of the server's initial "opened" announcement.
///
/// The announcement is a JSON document carried in the payload of the opened
/// message. Decoding fails fast when the session id or either keep-alive
/// parameter is absent; the upgrade list is informational and may be
/// omitted.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use sockwire::HandshakePayload;
///
/// let payload = HandshakePayload::parse(
///     r#"{"sid":"abc","pingInterval":25000,"pingTimeout":20000,"upgrades":["websocket"]}"#,
/// )?;
/// assert_eq!(payload.sid, "abc");
/// assert_eq!(payload.keep_alive_interval(), Duration::from_secs(25));
/// assert_eq!(payload.keep_alive_timeout(), Duration::from_secs(20));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HandshakePayload {
    /// Opaque session identifier assigned once by the server.
    pub sid: String,
    /// Interval between keep-alive probes, in milliseconds.
    ping_interval: u64,
    /// Deadline for a probe to be acknowledged, in milliseconds.
    ping_timeout: u64,
    /// Upgrade paths offered by the server. Not acted on by the engine.
    #[serde(default)]
    pub upgrades: Vec<String>,
}

impl HandshakePayload {
    /// Parse an opened announcement.
    ///
    /// # Errors
    ///
    /// Returns the underlying decode error when `text` is not a JSON object
    /// or when `sid`, `pingInterval`, or `pingTimeout` is missing or has the
    /// wrong type.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> { serde_json::from_str(text) }

    /// Server-assigned interval between keep-alive probes.
    #[must_use]
    pub const fn keep_alive_interval(&self) -> Duration {
        Duration::from_millis(self.ping_interval)
    }

    /// Server-assigned deadline for each keep-alive probe.
    #[must_use]
    pub const fn keep_alive_timeout(&self) -> Duration { Duration::from_millis(self.ping_timeout) }
}
