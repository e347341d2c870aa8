//! AEAD capability trait, plus AES-GCM reference adapters.
//!
//! The wire framing (4-byte static IV + 8-byte explicit nonce, 16-byte tag)
//! lives in [`crate::codec::gcm`]; this module only wraps the underlying
//! authenticated-encryption primitive.

use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes128Gcm, Aes256Gcm, Nonce};

use crate::error::{EngineError, Result};

/// AES-GCM with a 12-byte nonce and 16-byte tag.
pub trait AeadGcm: Send + Sync {
    /// Tag length in bytes; always 16 for the suites this engine supports.
    fn tag_len(&self) -> usize {
        16
    }
    /// Encrypt `buf` in place under `key`, appending the tag. `nonce` must
    /// be exactly 12 bytes.
    fn seal(&self, key: &[u8], nonce: &[u8; 12], aad: &[u8], buf: &mut Vec<u8>) -> Result<()>;
    /// Decrypt `buf` in place, where the trailing `tag_len()` bytes are the
    /// authentication tag; truncates `buf` to the plaintext length on
    /// success.
    fn open(&self, key: &[u8], nonce: &[u8; 12], aad: &[u8], buf: &mut Vec<u8>) -> Result<()>;
}

/// AES-128-GCM.
#[derive(Debug, Default, Clone, Copy)]
pub struct Aes128GcmAlg;

impl AeadGcm for Aes128GcmAlg {
    fn seal(&self, key: &[u8], nonce: &[u8; 12], aad: &[u8], buf: &mut Vec<u8>) -> Result<()> {
        let cipher = Aes128Gcm::new_from_slice(key).map_err(|_| EngineError::BadParam)?;
        let nonce = Nonce::from_slice(nonce);
        cipher
            .encrypt_in_place(nonce, aad, buf)
            .map_err(|_| EngineError::BadParam)
    }

    fn open(&self, key: &[u8], nonce: &[u8; 12], aad: &[u8], buf: &mut Vec<u8>) -> Result<()> {
        let cipher = Aes128Gcm::new_from_slice(key).map_err(|_| EngineError::BadParam)?;
        let nonce = Nonce::from_slice(nonce);
        cipher
            .decrypt_in_place(nonce, aad, buf)
            .map_err(|_| EngineError::BadMac)
    }
}

/// AES-256-GCM.
#[derive(Debug, Default, Clone, Copy)]
pub struct Aes256GcmAlg;

impl AeadGcm for Aes256GcmAlg {
    fn seal(&self, key: &[u8], nonce: &[u8; 12], aad: &[u8], buf: &mut Vec<u8>) -> Result<()> {
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EngineError::BadParam)?;
        let nonce = Nonce::from_slice(nonce);
        cipher
            .encrypt_in_place(nonce, aad, buf)
            .map_err(|_| EngineError::BadParam)
    }

    fn open(&self, key: &[u8], nonce: &[u8; 12], aad: &[u8], buf: &mut Vec<u8>) -> Result<()> {
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EngineError::BadParam)?;
        let nonce = Nonce::from_slice(nonce);
        cipher
            .decrypt_in_place(nonce, aad, buf)
            .map_err(|_| EngineError::BadMac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aes128_gcm_round_trips() {
        let key = [0x11u8; 16];
        let nonce = [0x22u8; 12];
        let aad = b"header";
        let mut buf = b"hello tls record layer".to_vec();
        let plaintext = buf.clone();

        Aes128GcmAlg.seal(&key, &nonce, aad, &mut buf).unwrap();
        assert_ne!(buf[..plaintext.len()], plaintext[..]);

        Aes128GcmAlg.open(&key, &nonce, aad, &mut buf).unwrap();
        assert_eq!(buf, plaintext);
    }

    #[test]
    fn tampered_tag_is_rejected() {
        let key = [0x11u8; 16];
        let nonce = [0x22u8; 12];
        let aad = b"header";
        let mut buf = b"hello".to_vec();
        Aes128GcmAlg.seal(&key, &nonce, aad, &mut buf).unwrap();
        let last = buf.len() - 1;
        buf[last] ^= 0xFF;
        assert_eq!(Aes128GcmAlg.open(&key, &nonce, aad, &mut buf), Err(EngineError::BadMac));
    }
}
