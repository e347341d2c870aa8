//! AEAD-GCM codec: 4-byte salt (fixed IV) + 8-byte explicit nonce (the
//! sequence number, big-endian), CTR+GHASH via the underlying AEAD, 16-byte
//! tag.

use crate::codec::{build_aad, InboundCodec, OutboundCodec};
use crate::error::{EngineError, Result};
use crate::primitives::aead::AeadGcm;
use crate::version::MAX_CIPHERTEXT_LEN;

/// AEAD-GCM record protection for one direction.
pub struct GcmCodec {
    pub aead: &'static dyn AeadGcm,
    pub key: Vec<u8>,
    /// 4-byte implementation-chosen salt, fixed for the life of the
    /// connection; concatenated with the 8-byte explicit nonce to form the
    /// 12-byte GCM nonce.
    pub fixed_iv: [u8; 4],
}

impl GcmCodec {
    fn nonce(&self, seq: u64) -> [u8; 12] {
        let mut nonce = [0u8; 12];
        nonce[..4].copy_from_slice(&self.fixed_iv);
        nonce[4..].copy_from_slice(&seq.to_be_bytes());
        nonce
    }
}

impl OutboundCodec for GcmCodec {
    fn max_plaintext(&self) -> usize {
        crate::version::MAX_PLAINTEXT_LEN
    }

    fn encrypt(
        &mut self,
        content_type: u8,
        version: u16,
        seq: u64,
        plaintext: &[u8],
        out: &mut Vec<u8>,
    ) -> Result<()> {
        let aad = build_aad(content_type, version, seq, plaintext.len() as u16);
        let mut buf = plaintext.to_vec();
        self.aead.seal(&self.key, &self.nonce(seq), &aad, &mut buf)?;

        out.extend_from_slice(&seq.to_be_bytes());
        out.extend_from_slice(&buf);
        Ok(())
    }
}

impl InboundCodec for GcmCodec {
    fn check_length(&self, len: usize) -> Result<()> {
        let tag_len = self.aead.tag_len();
        if len > MAX_CIPHERTEXT_LEN {
            return Err(EngineError::TooLarge);
        }
        if len < 8 + tag_len {
            return Err(EngineError::BadLength);
        }
        Ok(())
    }

    fn decrypt(
        &mut self,
        content_type: u8,
        version: u16,
        seq: u64,
        ciphertext: &mut [u8],
    ) -> Result<usize> {
        self.check_length(ciphertext.len())?;
        let explicit_nonce = u64::from_be_bytes(ciphertext[..8].try_into().unwrap());
        if explicit_nonce != seq {
            return Err(EngineError::BadMac);
        }

        let sealed_len = ciphertext.len() - 8;
        let plain_len = sealed_len - self.aead.tag_len();
        let aad = build_aad(content_type, version, seq, plain_len as u16);

        let mut buf = ciphertext[8..].to_vec();
        self.aead.open(&self.key, &self.nonce(seq), &aad, &mut buf)?;

        ciphertext[..buf.len()].copy_from_slice(&buf);
        Ok(buf.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::aead::Aes128GcmAlg;

    fn test_codec() -> GcmCodec {
        GcmCodec {
            aead: &Aes128GcmAlg,
            key: vec![0x55; 16],
            fixed_iv: [0xAA; 4],
        }
    }

    #[test]
    fn round_trips() {
        let mut enc = test_codec();
        let mut dec = test_codec();
        let mut out = Vec::new();
        enc.encrypt(23, 0x0303, 7, b"application data", &mut out)
            .unwrap();

        let mut buf = out;
        let n = dec.decrypt(23, 0x0303, 7, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"application data");
    }

    #[test]
    fn nonce_advances_with_sequence_number() {
        let mut codec = test_codec();
        let n0 = codec.nonce(0);
        let n1 = codec.nonce(1);
        assert_ne!(n0, n1);
        assert_eq!(&n0[..4], &n1[..4]);
    }

    #[test]
    fn rejects_mismatched_explicit_nonce() {
        let mut enc = test_codec();
        let mut dec = test_codec();
        let mut out = Vec::new();
        enc.encrypt(23, 0x0303, 3, b"data", &mut out).unwrap();

        let mut buf = out;
        // decrypt() is told the wrong expected sequence number
        assert_eq!(
            dec.decrypt(23, 0x0303, 4, &mut buf),
            Err(EngineError::BadMac)
        );
    }
}
