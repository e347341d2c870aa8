//! HMAC capability trait and the TLS 1.2 PRF built on top of it.

use hmac::{Hmac, Mac as HmacTrait};
use sha2::Sha256;

use crate::error::{EngineError, Result};
use crate::primitives::Prf;

/// A keyed HMAC instance. Codec code needs only one-shot `mac()`, while the
/// PRF needs to run HMAC repeatedly over a growing seed.
pub trait HmacAlg: Send + Sync {
    /// MAC output length in bytes, matching the underlying hash's output.
    fn output_len(&self) -> usize;
    /// Compute `HMAC(key, data)`, writing `output_len()` bytes into `out`.
    fn mac(&self, key: &[u8], data: &[u8], out: &mut [u8]);
}

/// HMAC-SHA-256, the sole PRF hash this engine implements (TLS 1.2 fixes the
/// PRF to SHA-256 unless a suite says otherwise; the two SHA-384 GCM suites
/// are handled by [`HmacSha384`]).
#[derive(Debug, Default, Clone, Copy)]
pub struct HmacSha256;

impl HmacAlg for HmacSha256 {
    fn output_len(&self) -> usize {
        32
    }
    fn mac(&self, key: &[u8], data: &[u8], out: &mut [u8]) {
        let mut mac = <Hmac<Sha256> as HmacTrait>::new_from_slice(key)
            .expect("HMAC accepts keys of any length");
        mac.update(data);
        let result = mac.finalize().into_bytes();
        out[..32].copy_from_slice(&result);
    }
}

/// HMAC-SHA-1, used by the legacy CBC cipher suites' record MAC.
#[derive(Debug, Default, Clone, Copy)]
pub struct HmacSha1;

impl HmacAlg for HmacSha1 {
    fn output_len(&self) -> usize {
        20
    }
    fn mac(&self, key: &[u8], data: &[u8], out: &mut [u8]) {
        let mut mac = <Hmac<sha1::Sha1> as HmacTrait>::new_from_slice(key)
            .expect("HMAC accepts keys of any length");
        mac.update(data);
        let result = mac.finalize().into_bytes();
        out[..20].copy_from_slice(&result);
    }
}

/// HMAC-SHA-384, used by the PRF of the two SHA-384 GCM suites.
#[derive(Debug, Default, Clone, Copy)]
pub struct HmacSha384;

impl HmacAlg for HmacSha384 {
    fn output_len(&self) -> usize {
        48
    }
    fn mac(&self, key: &[u8], data: &[u8], out: &mut [u8]) {
        let mut mac = <Hmac<sha2::Sha384> as HmacTrait>::new_from_slice(key)
            .expect("HMAC accepts keys of any length");
        mac.update(data);
        let result = mac.finalize().into_bytes();
        out[..48].copy_from_slice(&result);
    }
}

/// RFC 5246 §5 `P_hash` PRF, parameterized over any [`HmacAlg`].
pub struct HmacPrf<'a> {
    pub hmac: &'a dyn HmacAlg,
}

impl<'a> Prf for HmacPrf<'a> {
    fn expand(&self, secret: &[u8], label: &[u8], seed: &[u8], out: &mut [u8]) -> Result<()> {
        let hlen = self.hmac.output_len();
        let mut full_seed = Vec::with_capacity(label.len() + seed.len());
        full_seed.extend_from_slice(label);
        full_seed.extend_from_slice(seed);

        let mut a = vec![0u8; hlen];
        self.hmac.mac(secret, &full_seed, &mut a);

        let mut filled = 0;
        let mut buf = vec![0u8; hlen];
        while filled < out.len() {
            let mut input = Vec::with_capacity(hlen + full_seed.len());
            input.extend_from_slice(&a);
            input.extend_from_slice(&full_seed);
            self.hmac.mac(secret, &input, &mut buf);

            let take = core::cmp::min(hlen, out.len() - filled);
            out[filled..filled + take].copy_from_slice(&buf[..take]);
            filled += take;

            let mut next_a = vec![0u8; hlen];
            self.hmac.mac(secret, &a, &mut next_a);
            a = next_a;
        }
        Ok(())
    }
}

/// Ensures a requested output length is achievable without silently
/// truncating key material; the PRF itself never fails, but callers that
/// pass a zero-length secret are almost certainly misconfigured.
pub fn check_secret_nonempty(secret: &[u8]) -> Result<()> {
    if secret.is_empty() {
        return Err(EngineError::BadParam);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prf_expands_to_requested_length() {
        let hmac = HmacSha256;
        let prf = HmacPrf { hmac: &hmac };
        let mut out = [0u8; 48];
        prf.expand(b"secret", b"master secret", b"seedseed", &mut out)
            .unwrap();
        assert!(out.iter().any(|&b| b != 0));
    }

    #[test]
    fn prf_is_deterministic() {
        let hmac = HmacSha256;
        let prf = HmacPrf { hmac: &hmac };
        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        prf.expand(b"secret", b"label", b"seed", &mut a).unwrap();
        prf.expand(b"secret", b"label", b"seed", &mut b).unwrap();
        assert_eq!(a, b);
    }
}
