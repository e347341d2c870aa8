//! Block-cipher capability trait, plus AES-CBC reference adapters.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::{Aes128, Aes256};
use cbc::{Decryptor, Encryptor};

use crate::error::{EngineError, Result};

/// A block size-16 cipher run in CBC mode, as used by the legacy CBC+HMAC
/// codec. Operates on whole, already-padded buffers: callers are
/// responsible for padding before [`encrypt`](BlockCipherCbc::encrypt) and
/// for stripping it after [`decrypt`](BlockCipherCbc::decrypt).
pub trait BlockCipherCbc: Send + Sync {
    /// Cipher block size; always 16 for the suites this engine supports.
    fn block_size(&self) -> usize {
        16
    }
    /// Encrypt `buf` in place under `key`/`iv`. `buf.len()` must be a
    /// multiple of the block size.
    fn encrypt(&self, key: &[u8], iv: &[u8; 16], buf: &mut [u8]) -> Result<()>;
    /// Decrypt `buf` in place under `key`/`iv`. `buf.len()` must be a
    /// multiple of the block size.
    fn decrypt(&self, key: &[u8], iv: &[u8; 16], buf: &mut [u8]) -> Result<()>;
}

fn check_block_aligned(buf: &[u8]) -> Result<()> {
    if buf.is_empty() || buf.len() % 16 != 0 {
        return Err(EngineError::BadLength);
    }
    Ok(())
}

/// AES-128-CBC.
#[derive(Debug, Default, Clone, Copy)]
pub struct Aes128Cbc;

impl BlockCipherCbc for Aes128Cbc {
    fn encrypt(&self, key: &[u8], iv: &[u8; 16], buf: &mut [u8]) -> Result<()> {
        check_block_aligned(buf)?;
        let mut enc = Encryptor::<Aes128>::new_from_slices(key, iv).map_err(|_| EngineError::BadParam)?;
        for block in buf.chunks_exact_mut(16) {
            enc.encrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        Ok(())
    }

    fn decrypt(&self, key: &[u8], iv: &[u8; 16], buf: &mut [u8]) -> Result<()> {
        check_block_aligned(buf)?;
        let mut dec = Decryptor::<Aes128>::new_from_slices(key, iv).map_err(|_| EngineError::BadParam)?;
        for block in buf.chunks_exact_mut(16) {
            dec.decrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        Ok(())
    }
}

/// AES-256-CBC.
#[derive(Debug, Default, Clone, Copy)]
pub struct Aes256Cbc;

impl BlockCipherCbc for Aes256Cbc {
    fn encrypt(&self, key: &[u8], iv: &[u8; 16], buf: &mut [u8]) -> Result<()> {
        check_block_aligned(buf)?;
        let mut enc = Encryptor::<Aes256>::new_from_slices(key, iv).map_err(|_| EngineError::BadParam)?;
        for block in buf.chunks_exact_mut(16) {
            enc.encrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        Ok(())
    }

    fn decrypt(&self, key: &[u8], iv: &[u8; 16], buf: &mut [u8]) -> Result<()> {
        check_block_aligned(buf)?;
        let mut dec = Decryptor::<Aes256>::new_from_slices(key, iv).map_err(|_| EngineError::BadParam)?;
        for block in buf.chunks_exact_mut(16) {
            dec.decrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aes128_cbc_round_trips() {
        let key = [0x42u8; 16];
        let iv = [0x24u8; 16];
        let mut buf = [0u8; 32];
        for (i, b) in buf.iter_mut().enumerate() {
            *b = i as u8;
        }
        let original = buf;

        Aes128Cbc.encrypt(&key, &iv, &mut buf).unwrap();
        assert_ne!(buf, original);

        Aes128Cbc.decrypt(&key, &iv, &mut buf).unwrap();
        assert_eq!(buf, original);
    }

    #[test]
    fn rejects_unaligned_buffer() {
        let key = [0u8; 16];
        let iv = [0u8; 16];
        let mut buf = [0u8; 15];
        assert_eq!(Aes128Cbc.encrypt(&key, &iv, &mut buf), Err(EngineError::BadLength));
    }
}
