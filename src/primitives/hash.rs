//! Hash-algorithm capability trait, plus SHA-1/SHA-256/SHA-384 adapters.

use digest::Digest;
use sha1::Sha1;
use sha2::{Sha256, Sha384};

/// A hash algorithm the MAC/PRF layer can run, identified by its fixed
/// output length so codec code can size buffers without matching on a tag.
pub trait HashAlg: Send + Sync {
    /// Output length in bytes (20 for SHA-1, 32 for SHA-256, 48 for SHA-384).
    fn output_len(&self) -> usize;
    /// Internal block length in bytes, needed by HMAC's key-padding rule.
    fn block_len(&self) -> usize;
    /// One-shot hash of `data`, written into `out[..output_len()]`.
    fn hash(&self, data: &[u8], out: &mut [u8]);
}

/// SHA-1, used by legacy CBC cipher suites' HMAC.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha1Alg;

impl HashAlg for Sha1Alg {
    fn output_len(&self) -> usize {
        20
    }
    fn block_len(&self) -> usize {
        64
    }
    fn hash(&self, data: &[u8], out: &mut [u8]) {
        let digest = Sha1::digest(data);
        out[..20].copy_from_slice(&digest);
    }
}

/// SHA-256, used by the TLS 1.2 PRF and SHA-256 HMAC suites.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Alg;

impl HashAlg for Sha256Alg {
    fn output_len(&self) -> usize {
        32
    }
    fn block_len(&self) -> usize {
        64
    }
    fn hash(&self, data: &[u8], out: &mut [u8]) {
        let digest = Sha256::digest(data);
        out[..32].copy_from_slice(&digest);
    }
}

/// SHA-384, used by the PRF of the two SHA-384 GCM suites.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha384Alg;

impl HashAlg for Sha384Alg {
    fn output_len(&self) -> usize {
        48
    }
    fn block_len(&self) -> usize {
        128
    }
    fn hash(&self, data: &[u8], out: &mut [u8]) {
        let digest = Sha384::digest(data);
        out[..48].copy_from_slice(&digest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty_matches_known_answer() {
        let mut out = [0u8; 32];
        Sha256Alg.hash(b"", &mut out);
        assert_eq!(
            hex_bytes(&out),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b85"
        );
    }

    fn hex_bytes(b: &[u8]) -> String {
        b.iter().map(|x| format!("{:02x}", x)).collect()
    }
}
