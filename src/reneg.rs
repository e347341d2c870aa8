//! RFC 5746 secure renegotiation bookkeeping.

use crate::error::{EngineError, Result};
use crate::flags::EngineFlags;

/// Length of the `Finished` message verify_data this engine stores to
/// authenticate the next renegotiation's `renegotiation_info` extension.
pub const SAVED_FINISHED_LEN: usize = 24;

/// Whether the peer is known to support RFC 5746 secure renegotiation.
/// Starts `Unknown` until a handshake processor observes the
/// `renegotiation_info` extension (or its absence) and calls
/// [`RenegState::set_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenegStatus {
    Unknown,
    Unsupported,
    Supported,
}

/// Secure-renegotiation state the engine carries across a connection's
/// lifetime. The bytes are opaque to the engine itself; the handshake
/// processor both fills and verifies `saved_finished`.
#[derive(Debug, Clone, Copy)]
pub struct RenegState {
    pub status: RenegStatus,
    pub saved_finished: [u8; SAVED_FINISHED_LEN],
    /// How many bytes of `saved_finished` are meaningful: 12 for the
    /// initial handshake's client Finished only, 24 once a server Finished
    /// has also been recorded.
    pub saved_len: usize,
}

impl RenegState {
    pub fn new() -> Self {
        RenegState {
            status: RenegStatus::Unknown,
            saved_finished: [0u8; SAVED_FINISHED_LEN],
            saved_len: 0,
        }
    }

    pub fn set_status(&mut self, status: RenegStatus) {
        self.status = status;
    }

    /// Record a `Finished` message's verify_data (12 bytes) in the next
    /// free half of `saved_finished`.
    pub fn record_finished(&mut self, verify_data: &[u8]) -> Result<()> {
        if verify_data.len() != 12 {
            return Err(EngineError::BadParam);
        }
        if self.saved_len + 12 > SAVED_FINISHED_LEN {
            return Err(EngineError::BadSecReneg);
        }
        self.saved_finished[self.saved_len..self.saved_len + 12].copy_from_slice(verify_data);
        self.saved_len += 12;
        Ok(())
    }

    /// Reset to just the client's half after a completed renegotiation, so
    /// the next renegotiation's `renegotiation_info` is built fresh.
    pub fn reset_for_new_handshake(&mut self) {
        self.saved_len = 0;
    }

    /// Whether a renegotiation attempt should be allowed given the host's
    /// configured flags and what is known about the peer.
    pub fn renegotiation_allowed(&self, flags: EngineFlags) -> bool {
        if flags.contains(EngineFlags::NO_RENEGOTIATION) {
            return false;
        }
        matches!(self.status, RenegStatus::Supported)
    }
}

impl Default for RenegState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renegotiation_blocked_until_peer_support_known() {
        let state = RenegState::new();
        assert!(!state.renegotiation_allowed(EngineFlags::empty()));
    }

    #[test]
    fn no_renegotiation_flag_overrides_peer_support() {
        let mut state = RenegState::new();
        state.set_status(RenegStatus::Supported);
        assert!(!state.renegotiation_allowed(EngineFlags::NO_RENEGOTIATION));
        assert!(state.renegotiation_allowed(EngineFlags::empty()));
    }

    #[test]
    fn saved_finished_fills_both_halves() {
        let mut state = RenegState::new();
        state.record_finished(&[1u8; 12]).unwrap();
        state.record_finished(&[2u8; 12]).unwrap();
        assert_eq!(state.saved_len, 24);
        assert_eq!(
            state.record_finished(&[3u8; 12]),
            Err(EngineError::BadSecReneg)
        );
    }
}
