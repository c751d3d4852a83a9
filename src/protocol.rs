//! Protocol generations supported by the transport engine.

/// Wire protocol generation spoken with the peer.
///
/// Exactly two mutually incompatible generations are supported side by side.
/// They differ in who initiates keep-alive probes, whether a namespace-connect
/// frame must be sent explicitly, and whether a connected acknowledgement must
/// wait for the handshake payload. All behavioural differences live in guarded
/// branches inside the engine rather than in separate engine types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    /// Legacy generation: the client initiates keep-alive probes after a
    /// namespace connection is acknowledged, and the acknowledgement itself
    /// must wait for the handshake payload.
    V3,
    /// Current generation: the server initiates keep-alive probes and a
    /// namespace-connect frame is always sent once the handshake arrives.
    #[default]
    V4,
}

impl ProtocolVersion {
    /// Whether this is the legacy generation.
    #[must_use]
    pub const fn is_legacy(self) -> bool { matches!(self, Self::V3) }
}

#[cfg(test)]
mod tests {
    use super::ProtocolVersion;

    #[test]
    fn only_v3_is_legacy() {
        assert!(ProtocolVersion::V3.is_legacy());
        assert!(!ProtocolVersion::V4.is_legacy());
    }

    #[test]
    fn current_generation_is_the_default() {
        assert_eq!(ProtocolVersion::default(), ProtocolVersion::V4);
    }
}
