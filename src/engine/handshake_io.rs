//! Raw handshake byte-stream plumbing.
//!
//! This engine carries handshake records without parsing their message
//! structure: building `ClientHello`/`ServerHello`/`Finished` etc. is a
//! handshake-processor concern layered on top, out of scope here. What the
//! engine owns is getting opaque handshake bytes across the wire with the
//! right content type and under whichever codec is active, symmetric with
//! how it treats application data.

use crate::error::Result;

/// Scratch buffers for handshake bytes, separate from the application-data
/// streams so a layered handshake processor never competes with the
/// application for `recvapp`/`sendapp` space.
#[derive(Debug)]
pub struct HandshakeIo {
    pub inbound: Vec<u8>,
    pub outbound: Vec<u8>,
}

impl HandshakeIo {
    pub fn new() -> Self {
        HandshakeIo {
            inbound: Vec::new(),
            outbound: Vec::new(),
        }
    }

    /// Called by the engine when a Handshake-typed record has been
    /// decrypted; appends the plaintext for a handshake processor to pick
    /// up later via [`take_inbound`](Self::take_inbound).
    pub fn deliver_inbound(&mut self, plaintext: &[u8]) {
        self.inbound.extend_from_slice(plaintext);
    }

    /// Drain all buffered inbound handshake bytes.
    pub fn take_inbound(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.inbound)
    }

    /// Queue handshake bytes for the engine to encrypt and push into
    /// `sendrec` on its next scheduling pass.
    pub fn queue_outbound(&mut self, bytes: &[u8]) -> Result<()> {
        self.outbound.extend_from_slice(bytes);
        Ok(())
    }

    /// Drain all buffered outbound handshake bytes.
    pub fn take_outbound(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.outbound)
    }
}

impl Default for HandshakeIo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_round_trips() {
        let mut hio = HandshakeIo::new();
        hio.deliver_inbound(b"client hello bytes");
        assert_eq!(hio.take_inbound(), b"client hello bytes");
        assert!(hio.take_inbound().is_empty());
    }

    #[test]
    fn outbound_round_trips() {
        let mut hio = HandshakeIo::new();
        hio.queue_outbound(b"server hello bytes").unwrap();
        assert_eq!(hio.take_outbound(), b"server hello bytes");
    }
}
