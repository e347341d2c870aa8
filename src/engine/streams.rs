//! The four push/pull accessor streams a host drives the engine with.

use log::{debug, warn};

use crate::codec::{InboundCodec, OutboundCodec};
use crate::engine::alert::Alert;
use crate::engine::Engine;
use crate::error::{EngineError, Result};
use crate::record::{RecordHeader, HEADER_LEN};
use crate::version::{ContentType, MAX_CIPHERTEXT_LEN};

impl Engine {
    /// Writable region for plaintext the host wants to send as application
    /// data. Write into the returned slice, then call
    /// [`sendapp_ack`](Self::sendapp_ack) with the number of bytes written.
    /// Fails `UNEXPECTED` until the handshake layer has called
    /// [`Engine::mark_application_data_ready`].
    pub fn sendapp_buf(&mut self) -> Result<&mut [u8]> {
        self.ensure_ok()?;
        if !self.application_data {
            return Err(EngineError::Unexpected);
        }
        Ok(self.send_buf.free_mut())
    }

    /// Commit `n` bytes written via `sendapp_buf` as staged plaintext, then
    /// opportunistically flush: if enough has accumulated to fill a
    /// maximum-size record it is sealed immediately, otherwise the bytes
    /// wait for a later write or an explicit [`Engine::flush`].
    pub fn sendapp_ack(&mut self, n: usize) -> Result<()> {
        self.ensure_ok()?;
        if !self.application_data {
            return Err(EngineError::Unexpected);
        }
        self.send_buf.commit_staged(n)?;
        self.flush(false)
    }

    /// Seal staged application data into records. With `force == false`,
    /// only fragments already at the codec's maximum size are sealed
    /// (batching small writes together); with `force == true`, whatever is
    /// staged is sealed as a single record even if short, and a connection
    /// with nothing staged emits no record at all (there is no standalone
    /// empty-record keepalive independent of the TLS 1.0 1/n-1 split).
    pub fn flush(&mut self, force: bool) -> Result<()> {
        self.ensure_ok()?;
        loop {
            let staged_len = self.send_buf.staged_len();
            if staged_len == 0 {
                break;
            }
            let max_frag = self.outbound_codec.max_plaintext();
            if !force && staged_len < max_frag {
                break;
            }
            let take = core::cmp::min(max_frag, staged_len);
            if let Err(e) = self.emit_app_chunk(take) {
                self.set_error(e);
                return Err(e);
            }
            if take < max_frag {
                break;
            }
        }
        Ok(())
    }

    /// Readable decrypted application data the host has not yet consumed.
    pub fn recvapp_buf(&self) -> Result<&[u8]> {
        self.ensure_ok()?;
        Ok(self.recv_buf.ready())
    }

    pub fn recvapp_ack(&mut self, n: usize) -> Result<()> {
        self.ensure_ok()?;
        self.recv_buf.ack_ready(n)
    }

    /// Readable ciphertext bytes the host should push to the transport.
    pub fn sendrec_buf(&self) -> Result<&[u8]> {
        self.ensure_ok()?;
        Ok(self.send_buf.ready())
    }

    pub fn sendrec_ack(&mut self, n: usize) -> Result<()> {
        self.ensure_ok()?;
        self.send_buf.ack_ready(n)
    }

    /// Writable region for raw bytes the host has read from the transport.
    pub fn recvrec_buf(&mut self) -> Result<&mut [u8]> {
        self.ensure_ok()?;
        if self.recv_closed {
            return Err(EngineError::Unexpected);
        }
        Ok(self.recv_buf.free_mut())
    }

    /// Commit `n` bytes written via `recvrec_buf`, then parse and decrypt
    /// as many complete records as are now available.
    pub fn recvrec_ack(&mut self, n: usize) -> Result<()> {
        self.ensure_ok()?;
        self.recv_buf.commit_staged(n)?;
        loop {
            match self.try_consume_one_record() {
                Ok(true) => continue,
                Ok(false) => break,
                Err(e) => {
                    warn!("dropping connection after record processing error: {}", e);
                    self.set_error(e);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Encrypt one already-sliced chunk of staged plaintext (possibly
    /// preceded by an empty-fragment record for the TLS 1.0 1/n-1 split)
    /// and promote the result into the ready region. `chunk_len` must be
    /// at most `send_buf.staged_len()`.
    fn emit_app_chunk(&mut self, chunk_len: usize) -> Result<()> {
        let chunk = self.send_buf.staged()[..chunk_len].to_vec();
        if self.outbound_codec.needs_split_for(chunk.len()) {
            self.emit_record(ContentType::ApplicationData, 0, &[])?;
        }
        self.emit_record(ContentType::ApplicationData, chunk_len, &chunk)
    }

    /// Encrypt `plaintext` under a fresh sequence number into one wire
    /// record, removing `consume` bytes from the front of `send_buf`'s
    /// staged region and appending the record to its ready region.
    fn emit_record(&mut self, content_type: ContentType, consume: usize, plaintext: &[u8]) -> Result<()> {
        let seq = self.seq_out;
        let mut body = Vec::new();
        self.outbound_codec
            .encrypt(content_type as u8, self.version, seq, plaintext, &mut body)?;
        self.advance_seq_out()?;
        if body.len() > MAX_CIPHERTEXT_LEN {
            return Err(EngineError::TooLarge);
        }

        let header = RecordHeader {
            content_type,
            version: self.version,
            length: body.len() as u16,
        };
        let mut wire = Vec::with_capacity(HEADER_LEN + body.len());
        let mut header_bytes = [0u8; HEADER_LEN];
        header.write(&mut header_bytes);
        wire.extend_from_slice(&header_bytes);
        wire.extend_from_slice(&body);

        self.send_buf.promote(consume, &wire)
    }

    /// Attempt to parse and process one record from `recv_buf`'s staged
    /// bytes. Returns `Ok(true)` if a record was consumed (so the caller
    /// should try again), `Ok(false)` if more bytes are needed.
    fn try_consume_one_record(&mut self) -> Result<bool> {
        let pending = self.recv_buf.staged();
        if pending.len() < HEADER_LEN {
            return Ok(false);
        }
        let header = RecordHeader::parse(&pending[..HEADER_LEN])?;
        let total_len = HEADER_LEN + header.length as usize;
        if pending.len() < total_len {
            return Ok(false);
        }

        match self.version_in {
            Some(v) if v != header.version => return Err(EngineError::BadVersion),
            Some(_) => {}
            None => self.version_in = Some(header.version),
        }

        self.inbound_codec.check_length(header.length as usize)?;
        let mut body = pending[HEADER_LEN..total_len].to_vec();

        let seq = self.seq_in;
        let plain_len =
            self.inbound_codec
                .decrypt(header.content_type as u8, header.version, seq, &mut body)?;
        self.advance_seq_in()?;
        body.truncate(plain_len);

        match header.content_type {
            ContentType::ApplicationData => {
                if !self.application_data {
                    return Err(EngineError::Unexpected);
                }
                self.recv_buf.promote(total_len, &body)?;
            }
            ContentType::Handshake => {
                // Once the first handshake has completed, any further
                // Handshake record is a renegotiation attempt and must be
                // gated on RFC 5746 support.
                if self.application_data && !self.reneg.renegotiation_allowed(self.flags) {
                    return Err(EngineError::BadSecReneg);
                }
                self.hio.deliver_inbound(&body);
                self.recv_buf.promote(total_len, &[])?;
            }
            ContentType::Alert => {
                let alert = Alert::parse(&body)?;
                if alert.code == crate::version::alert_code::CLOSE_NOTIFY {
                    debug!("received close_notify");
                    self.recv_closed = true;
                } else if let Some(e) = alert.into_engine_error() {
                    return Err(e);
                }
                self.recv_buf.promote(total_len, &[])?;
            }
            ContentType::ChangeCipherSpec => {
                if body != [1u8] {
                    return Err(EngineError::BadCcs);
                }
                let codec = self
                    .pending_inbound_codec
                    .take()
                    .ok_or(EngineError::Unexpected)?;
                debug!("switching inbound codec on change-cipher-spec");
                self.inbound_codec = codec;
                self.seq_in = 0;
                self.recv_buf.promote(total_len, &[])?;
            }
        }
        Ok(true)
    }

    /// Send a change-cipher-spec record and switch the outbound codec to
    /// whichever one was previously queued via
    /// [`Engine::set_pending_outbound_codec`].
    pub fn send_change_cipher_spec(&mut self) -> Result<()> {
        self.ensure_ok()?;
        self.emit_record(ContentType::ChangeCipherSpec, 0, &[1u8])?;
        let codec = self
            .pending_outbound_codec
            .take()
            .ok_or(EngineError::Unexpected)?;
        self.outbound_codec = codec;
        self.seq_out = 0;
        Ok(())
    }

    /// Send a close_notify alert and mark the engine closed for writing.
    pub fn send_close_notify(&mut self) -> Result<()> {
        self.ensure_ok()?;
        let alert = Alert::close_notify();
        self.emit_record(ContentType::Alert, 0, &alert.to_bytes())?;
        self.send_closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::null::NullCodec;
    use crate::codec::Codec;

    #[test]
    fn app_data_round_trips_through_null_codec() {
        let mut sender = Engine::new();
        let mut receiver = Engine::new();
        sender.mark_application_data_ready();
        receiver.mark_application_data_ready();

        let n = {
            let buf = sender.sendapp_buf().unwrap();
            buf[..5].copy_from_slice(b"hello");
            5
        };
        sender.sendapp_ack(n).unwrap();
        sender.flush(true).unwrap();

        let wire = sender.sendrec_buf().unwrap().to_vec();
        sender.sendrec_ack(wire.len()).unwrap();

        {
            let buf = receiver.recvrec_buf().unwrap();
            buf[..wire.len()].copy_from_slice(&wire);
        }
        receiver.recvrec_ack(wire.len()).unwrap();

        assert_eq!(receiver.recvapp_buf().unwrap(), b"hello");
        receiver.recvapp_ack(5).unwrap();
        assert!(receiver.recvapp_buf().unwrap().is_empty());
    }

    #[test]
    fn sendapp_without_application_data_ready_is_rejected() {
        let mut engine = Engine::new();
        assert_eq!(engine.sendapp_buf().err(), Some(EngineError::Unexpected));
    }

    #[test]
    fn inbound_application_data_before_ready_is_rejected() {
        let mut sender = Engine::new();
        let mut receiver = Engine::new();
        sender.mark_application_data_ready();

        {
            let buf = sender.send_buf.free_mut();
            buf[..5].copy_from_slice(b"hello");
        }
        sender.send_buf.commit_staged(5).unwrap();
        sender.flush(true).unwrap();

        let wire = sender.sendrec_buf().unwrap().to_vec();
        sender.sendrec_ack(wire.len()).unwrap();

        {
            let buf = receiver.recvrec_buf().unwrap();
            buf[..wire.len()].copy_from_slice(&wire);
        }
        assert_eq!(
            receiver.recvrec_ack(wire.len()),
            Err(EngineError::Unexpected)
        );
    }

    #[test]
    fn close_notify_requires_both_directions_to_report_closed() {
        let mut sender = Engine::new();
        let mut receiver = Engine::new();
        sender.send_close_notify().unwrap();
        assert!(!sender.is_closed());

        let wire = sender.sendrec_buf().unwrap().to_vec();
        sender.sendrec_ack(wire.len()).unwrap();

        {
            let buf = receiver.recvrec_buf().unwrap();
            buf[..wire.len()].copy_from_slice(&wire);
        }
        receiver.recvrec_ack(wire.len()).unwrap();
        assert!(!receiver.is_closed());

        receiver.send_close_notify().unwrap();
        assert!(receiver.is_closed());
    }

    #[test]
    fn version_mismatch_on_later_record_is_rejected() {
        let mut engine = Engine::new();
        // content type 22 (Handshake) so the record isn't also gated by
        // `application_data`, which is unrelated to what this test checks.
        let first = [22u8, 0x03, 0x03, 0x00, 0x00];
        {
            let buf = engine.recvrec_buf().unwrap();
            buf[..first.len()].copy_from_slice(&first);
        }
        engine.recvrec_ack(first.len()).unwrap();
        assert_eq!(engine.version_in, Some(0x0303));

        let second = [22u8, 0x03, 0x01, 0x00, 0x00];
        {
            let buf = engine.recvrec_buf().unwrap();
            buf[..second.len()].copy_from_slice(&second);
        }
        assert_eq!(
            engine.recvrec_ack(second.len()),
            Err(EngineError::BadVersion)
        );
    }

    #[test]
    fn partial_record_is_not_consumed_early() {
        let mut engine = Engine::new();
        let header = [23u8, 0x03, 0x03, 0x00, 0x05];
        {
            let buf = engine.recvrec_buf().unwrap();
            buf[..header.len()].copy_from_slice(&header);
        }
        engine.recvrec_ack(header.len()).unwrap();
        assert!(engine.recvapp_buf().unwrap().is_empty());
    }

    #[test]
    fn change_cipher_spec_switches_codec() {
        let mut sender = Engine::new();
        let mut receiver = Engine::new();
        sender.set_pending_outbound_codec(Codec::Null(NullCodec));
        receiver.set_pending_inbound_codec(Codec::Null(NullCodec));

        sender.send_change_cipher_spec().unwrap();
        let wire = sender.sendrec_buf().unwrap().to_vec();
        sender.sendrec_ack(wire.len()).unwrap();

        {
            let buf = receiver.recvrec_buf().unwrap();
            buf[..wire.len()].copy_from_slice(&wire);
        }
        receiver.recvrec_ack(wire.len()).unwrap();
        assert_eq!(receiver.seq_in, 0);
    }

    #[test]
    fn renegotiation_attempt_without_secure_reneg_support_fails() {
        let mut sender = Engine::new();
        let mut receiver = Engine::new();
        sender.mark_application_data_ready();
        receiver.mark_application_data_ready();

        sender
            .emit_record(ContentType::Handshake, 0, b"client hello")
            .unwrap();
        let wire = sender.sendrec_buf().unwrap().to_vec();
        sender.sendrec_ack(wire.len()).unwrap();

        {
            let buf = receiver.recvrec_buf().unwrap();
            buf[..wire.len()].copy_from_slice(&wire);
        }
        assert_eq!(
            receiver.recvrec_ack(wire.len()),
            Err(EngineError::BadSecReneg)
        );
    }
}
