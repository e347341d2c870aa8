//! Self-contained HMAC-DRBG (NIST SP 800-90A §10.1.2), seeded from host
//! entropy injected via `inject_entropy` and/or an OS randomness fallback.

use hmac::{Hmac, Mac as HmacTrait};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::error::{EngineError, Result};
use crate::primitives::Drbg;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA-256-based DRBG state, zeroized on drop since `key`/`value` are
/// derived from secret entropy.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct HmacDrbg {
    key: [u8; 32],
    value: [u8; 32],
    seeded: bool,
}

impl HmacDrbg {
    /// A freshly constructed generator refuses to produce output until it
    /// has been seeded, matching the engine-wide rule that no record is
    /// ever sent or accepted before entropy has been injected.
    pub fn new() -> Self {
        HmacDrbg {
            key: [0u8; 32],
            value: [1u8; 32],
            seeded: false,
        }
    }

    /// Construct and immediately seed from OS entropy, the fallback path
    /// when the host never calls `inject_entropy`.
    pub fn from_os_entropy() -> Result<Self> {
        let mut seed = [0u8; 32];
        getrandom::getrandom(&mut seed).map_err(|_| EngineError::NoRandom)?;
        let mut drbg = Self::new();
        drbg.reseed(&seed);
        seed.zeroize();
        Ok(drbg)
    }

    fn hmac(&self, key: &[u8], data: &[&[u8]]) -> [u8; 32] {
        let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
        for chunk in data {
            mac.update(chunk);
        }
        let result = mac.finalize().into_bytes();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    fn update(&mut self, provided: &[u8]) {
        self.key = self.hmac(&self.key, &[&self.value, &[0x00], provided]);
        self.value = self.hmac(&self.key, &[&self.value]);
        if !provided.is_empty() {
            self.key = self.hmac(&self.key, &[&self.value, &[0x01], provided]);
            self.value = self.hmac(&self.key, &[&self.value]);
        }
    }
}

impl Default for HmacDrbg {
    fn default() -> Self {
        Self::new()
    }
}

impl Drbg for HmacDrbg {
    fn reseed(&mut self, entropy: &[u8]) {
        self.update(entropy);
        self.seeded = true;
    }

    fn generate(&mut self, out: &mut [u8]) -> Result<()> {
        if !self.seeded {
            return Err(EngineError::NoRandom);
        }
        let mut filled = 0;
        while filled < out.len() {
            self.value = self.hmac(&self.key, &[&self.value]);
            let take = core::cmp::min(32, out.len() - filled);
            out[filled..filled + take].copy_from_slice(&self.value[..take]);
            filled += take;
        }
        self.update(&[]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_to_generate_before_seeding() {
        let mut drbg = HmacDrbg::new();
        let mut out = [0u8; 16];
        assert_eq!(drbg.generate(&mut out), Err(EngineError::NoRandom));
    }

    #[test]
    fn deterministic_given_same_seed() {
        let mut a = HmacDrbg::new();
        a.reseed(b"fixed test seed");
        let mut b = HmacDrbg::new();
        b.reseed(b"fixed test seed");

        let mut out_a = [0u8; 40];
        let mut out_b = [0u8; 40];
        a.generate(&mut out_a).unwrap();
        b.generate(&mut out_b).unwrap();
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn successive_outputs_differ() {
        let mut drbg = HmacDrbg::new();
        drbg.reseed(b"seed");
        let mut first = [0u8; 16];
        let mut second = [0u8; 16];
        drbg.generate(&mut first).unwrap();
        drbg.generate(&mut second).unwrap();
        assert_ne!(first, second);
    }
}
