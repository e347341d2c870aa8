//! The identity codec active before the first change-cipher-spec.

use crate::codec::{InboundCodec, OutboundCodec};
use crate::error::{EngineError, Result};
use crate::version::MAX_PLAINTEXT_LEN;

/// Passes records through unmodified. Still enforces the plaintext length
/// ceiling so a peer cannot smuggle an oversized handshake record before
/// any cipher has been negotiated.
#[derive(Debug, Default)]
pub struct NullCodec;

impl OutboundCodec for NullCodec {
    fn max_plaintext(&self) -> usize {
        MAX_PLAINTEXT_LEN
    }

    fn encrypt(
        &mut self,
        _content_type: u8,
        _version: u16,
        _seq: u64,
        plaintext: &[u8],
        out: &mut Vec<u8>,
    ) -> Result<()> {
        if plaintext.len() > MAX_PLAINTEXT_LEN {
            return Err(EngineError::TooLarge);
        }
        out.extend_from_slice(plaintext);
        Ok(())
    }
}

impl InboundCodec for NullCodec {
    fn check_length(&self, len: usize) -> Result<()> {
        if len > MAX_PLAINTEXT_LEN {
            return Err(EngineError::BadLength);
        }
        Ok(())
    }

    fn decrypt(
        &mut self,
        _content_type: u8,
        _version: u16,
        _seq: u64,
        ciphertext: &mut [u8],
    ) -> Result<usize> {
        self.check_length(ciphertext.len())?;
        Ok(ciphertext.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_unchanged() {
        let mut codec = NullCodec;
        let mut out = Vec::new();
        codec.encrypt(23, 0x0303, 0, b"hello", &mut out).unwrap();
        assert_eq!(out, b"hello");

        let mut buf = out;
        let n = codec.decrypt(23, 0x0303, 0, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"hello");
    }

    #[test]
    fn rejects_oversized_plaintext() {
        let mut codec = NullCodec;
        let plaintext = vec![0u8; MAX_PLAINTEXT_LEN + 1];
        let mut out = Vec::new();
        assert_eq!(
            codec.encrypt(23, 0x0303, 0, &plaintext, &mut out),
            Err(EngineError::TooLarge)
        );
    }
}
