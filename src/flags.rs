//! Behavioural flags and scheduler-state flags.
//!
//! `EngineFlags` configures policy the engine itself stores and exposes (the
//! handshake processor, being out of scope here, is the one that actually
//! acts on `ENFORCE_SERVER_PREFERENCES`). `EngineState` is the set of flags
//! `current_state()` returns. `SENDAPP`/`SENDREC` draw on the same output
//! buffer's capacity and `RECVREC`/`RECVAPP` on the same input buffer's
//! capacity (see [`crate::engine::buffers::PartitionedBuffer`]), so filling
//! one side of a pair always shrinks the other's room rather than each
//! being backed by independent, identically-sized storage.

use bitflags::bitflags;

bitflags! {
    /// Host-configurable behavioural flags, set once via [`crate::config::EngineConfig`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EngineFlags: u32 {
        /// Prefer the server's cipher suite order over the client's.
        const ENFORCE_SERVER_PREFERENCES = 1 << 0;
        /// Refuse all renegotiation requests, even if the peer supports
        /// RFC 5746 secure renegotiation.
        const NO_RENEGOTIATION = 1 << 1;
    }
}

bitflags! {
    /// The engine's externally observable scheduler state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EngineState: u32 {
        const CLOSED = 1 << 0;
        const SENDREC = 1 << 1;
        const RECVREC = 1 << 2;
        const SENDAPP = 1 << 3;
        const RECVAPP = 1 << 4;
    }
}
