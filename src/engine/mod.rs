//! The record-layer engine: the buffer-cursor scheduler that drives the
//! four I/O streams, the active codec pair, and the sticky error latch.
//!
//! A host never calls into a TLS state machine here; it pushes and pulls
//! bytes through [`Engine`]'s four streams and reacts to
//! [`Engine::current_state`]. Handshake message parsing and key derivation
//! are a layered concern ([`crate::engine::handshake_io`] only carries the
//! opaque bytes); this module is the record layer plus the cipher-state
//! switch BearSSL calls `br_ssl_engine_context`.

pub mod alert;
pub mod buffers;
pub mod handshake_io;
mod streams;

use buffers::PartitionedBuffer;
use handshake_io::HandshakeIo;

use crate::codec::{null::NullCodec, Codec};
use crate::error::{EngineError, Result};
use crate::flags::{EngineFlags, EngineState};
use crate::reneg::RenegState;
use crate::version::{BUFSIZE_INPUT, BUFSIZE_OUTPUT, RECORD_OVERHEAD_SLACK, TLS_1_2};

/// The record-layer engine.
pub struct Engine {
    /// Outbound: ready region is pending ciphertext (`sendrec`), staged
    /// region is unencrypted app data waiting on a flush (`sendapp`).
    pub(crate) send_buf: PartitionedBuffer,
    /// Inbound: ready region is decrypted plaintext (`recvapp`), staged
    /// region is raw bytes not yet parsed into a complete record
    /// (`recvrec`).
    pub(crate) recv_buf: PartitionedBuffer,
    pub(crate) hio: HandshakeIo,

    pub(crate) version: u16,
    /// The version latched from the first inbound record; every later
    /// record must match it exactly.
    pub(crate) version_in: Option<u16>,
    pub(crate) flags: EngineFlags,
    /// Whether the handshake layer has told the engine application data
    /// may flow; gates both `sendapp` availability and inbound
    /// `ApplicationData` record acceptance.
    pub(crate) application_data: bool,
    pub(crate) send_closed: bool,
    pub(crate) recv_closed: bool,
    pub(crate) err: Option<EngineError>,

    pub(crate) outbound_codec: Codec,
    pub(crate) inbound_codec: Codec,
    pub(crate) pending_outbound_codec: Option<Codec>,
    pub(crate) pending_inbound_codec: Option<Codec>,

    pub(crate) seq_out: u64,
    pub(crate) seq_in: u64,
    pub(crate) reneg: RenegState,
}

/// What the host should do next, derived from [`Engine::current_state`]; a
/// single next-step for callers that don't want to branch on the raw
/// bitset themselves. Mirrors the `action`/`iomode` pairing a BearSSL-style
/// engine exposes to its driving loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SendRecord,
    RecvRecord,
    SendApp,
    RecvApp,
    Closed,
    Fail,
}

impl Engine {
    /// Construct a fresh engine with BearSSL-sized default buffers and the
    /// null codec active in both directions.
    pub fn new() -> Self {
        Self::with_buffer_sizes(BUFSIZE_INPUT, BUFSIZE_OUTPUT)
    }

    pub fn with_buffer_sizes(input_cap: usize, output_cap: usize) -> Self {
        Engine {
            send_buf: PartitionedBuffer::with_capacity(output_cap),
            recv_buf: PartitionedBuffer::with_capacity(input_cap),
            hio: HandshakeIo::new(),
            version: TLS_1_2,
            version_in: None,
            flags: EngineFlags::empty(),
            application_data: false,
            send_closed: false,
            recv_closed: false,
            err: None,
            outbound_codec: Codec::Null(NullCodec),
            inbound_codec: Codec::Null(NullCodec),
            pending_outbound_codec: None,
            pending_inbound_codec: None,
            seq_out: 0,
            seq_in: 0,
            reneg: RenegState::new(),
        }
    }

    pub fn set_flags(&mut self, flags: EngineFlags) {
        self.flags = flags;
    }

    pub fn flags(&self) -> EngineFlags {
        self.flags
    }

    pub fn set_version(&mut self, version: u16) {
        self.version = version;
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    /// Queue the codec the engine should switch *to* the next time it
    /// observes an outbound/inbound change-cipher-spec boundary. Deriving
    /// the codec's keys is a handshake-processor concern; this engine only
    /// performs the mechanical switch.
    pub fn set_pending_outbound_codec(&mut self, codec: Codec) {
        self.pending_outbound_codec = Some(codec);
    }

    pub fn set_pending_inbound_codec(&mut self, codec: Codec) {
        self.pending_inbound_codec = Some(codec);
    }

    /// Immediately swap the outbound codec, bypassing the change-cipher-spec
    /// record entirely; used by callers (and tests) that drive the codec
    /// switch directly rather than through the wire protocol.
    pub fn switch_outbound_codec(&mut self, codec: Codec) {
        self.outbound_codec = codec;
        self.seq_out = 0;
    }

    pub fn switch_inbound_codec(&mut self, codec: Codec) {
        self.inbound_codec = codec;
        self.seq_in = 0;
    }

    /// Called by the handshake layer once the first handshake's `Finished`
    /// messages have been exchanged: unlocks `sendapp` and inbound
    /// `ApplicationData` records.
    pub fn mark_application_data_ready(&mut self) {
        self.application_data = true;
    }

    pub fn application_data_ready(&self) -> bool {
        self.application_data
    }

    /// Current secure-renegotiation bookkeeping, read by the handshake
    /// layer when building or verifying a `renegotiation_info` extension.
    pub fn reneg_state(&self) -> &RenegState {
        &self.reneg
    }

    pub fn reneg_state_mut(&mut self) -> &mut RenegState {
        &mut self.reneg
    }

    /// Called by the handshake layer to request starting a renegotiation.
    /// Fails `BAD_SECRENEG` immediately if the peer is not known to support
    /// RFC 5746 or the host has disabled renegotiation entirely, instead of
    /// letting the attempt get as far as the wire.
    pub fn renegotiate(&mut self) -> Result<()> {
        self.ensure_ok()?;
        if !self.reneg.renegotiation_allowed(self.flags) {
            // Declining a renegotiation request is not itself a protocol
            // fault; the connection stays usable on its current session.
            return Err(EngineError::BadSecReneg);
        }
        self.reneg.reset_for_new_handshake();
        Ok(())
    }

    /// The first error the engine has latched, if any. Once set, the
    /// engine refuses all further I/O until the host discards it (there is
    /// no "unlatch"; a failed engine must be replaced).
    pub fn last_error(&self) -> Option<EngineError> {
        self.err
    }

    pub(crate) fn ensure_ok(&self) -> Result<()> {
        if let Some(e) = self.err {
            Err(e)
        } else {
            Ok(())
        }
    }

    /// Sticky error latch: only the first call after a clean state takes
    /// effect, matching BearSSL's "first error wins" rule.
    pub(crate) fn set_error(&mut self, e: EngineError) {
        if self.err.is_none() {
            self.err = Some(e);
        }
    }

    /// `true` only once both directions have exchanged `close_notify`.
    pub fn is_closed(&self) -> bool {
        self.send_closed && self.recv_closed
    }

    pub(crate) fn advance_seq_out(&mut self) -> Result<()> {
        self.seq_out = self.seq_out.checked_add(1).ok_or(EngineError::TooLarge)?;
        Ok(())
    }

    pub(crate) fn advance_seq_in(&mut self) -> Result<()> {
        self.seq_in = self.seq_in.checked_add(1).ok_or(EngineError::TooLarge)?;
        Ok(())
    }

    /// The externally observable scheduler state: which of the four
    /// streams currently have work available for the host. `SENDAPP` and
    /// `SENDREC` share one buffer's capacity, as do `RECVREC` and
    /// `RECVAPP`, so a host that drains one side promptly sees the other
    /// side's availability change in step.
    pub fn current_state(&self) -> EngineState {
        if self.is_closed() {
            return EngineState::CLOSED;
        }
        if self.err.is_some() {
            return EngineState::empty();
        }
        let mut state = EngineState::empty();
        if !self.send_buf.ready_is_empty() {
            state |= EngineState::SENDREC;
        }
        if !self.send_closed && self.application_data && self.send_buf.free_len() > RECORD_OVERHEAD_SLACK
        {
            state |= EngineState::SENDAPP;
        }
        if !self.recv_closed && self.recv_buf.free_len() > 0 {
            state |= EngineState::RECVREC;
        }
        if !self.recv_buf.ready_is_empty() {
            state |= EngineState::RECVAPP;
        }
        state
    }

    /// A single next step derived from [`current_state`](Self::current_state),
    /// for callers that want to branch on one action rather than a bitset.
    /// Priority favors draining outstanding work (`SENDREC`/`RECVAPP`)
    /// before offering new capacity (`RECVREC`/`SENDAPP`).
    pub fn next_action(&self) -> Action {
        if self.err.is_some() {
            return Action::Fail;
        }
        let state = self.current_state();
        if state.contains(EngineState::CLOSED) {
            return Action::Closed;
        }
        if state.contains(EngineState::SENDREC) {
            return Action::SendRecord;
        }
        if state.contains(EngineState::RECVAPP) {
            return Action::RecvApp;
        }
        if state.contains(EngineState::RECVREC) {
            return Action::RecvRecord;
        }
        if state.contains(EngineState::SENDAPP) {
            return Action::SendApp;
        }
        Action::RecvRecord
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_engine_accepts_input_but_not_app_writes() {
        let engine = Engine::new();
        let state = engine.current_state();
        assert!(state.contains(EngineState::RECVREC));
        assert!(!state.contains(EngineState::SENDAPP));
        assert!(!state.contains(EngineState::SENDREC));
        assert!(!state.contains(EngineState::RECVAPP));
    }

    #[test]
    fn application_data_ready_unlocks_sendapp() {
        let mut engine = Engine::new();
        assert!(!engine.current_state().contains(EngineState::SENDAPP));
        engine.mark_application_data_ready();
        assert!(engine.current_state().contains(EngineState::SENDAPP));
    }

    #[test]
    fn sticky_error_latches_first_value_only() {
        let mut engine = Engine::new();
        engine.set_error(EngineError::BadMac);
        engine.set_error(EngineError::BadLength);
        assert_eq!(engine.last_error(), Some(EngineError::BadMac));
    }

    #[test]
    fn closed_state_requires_both_directions() {
        let mut engine = Engine::new();
        engine.send_closed = true;
        assert_ne!(engine.current_state(), EngineState::CLOSED);
        engine.recv_closed = true;
        assert_eq!(engine.current_state(), EngineState::CLOSED);
    }

    #[test]
    fn renegotiate_fails_until_peer_support_known() {
        let mut engine = Engine::new();
        assert_eq!(engine.renegotiate(), Err(EngineError::BadSecReneg));
    }
}
