//! Capability traits for the cryptographic primitives the codecs and PRF
//! depend on, plus thin reference adapters wired to RustCrypto crates.
//!
//! The engine itself never implements AES, SHA, HMAC or GHASH: it drives
//! these traits the way [`crate::codec`] drives [`InboundCodec`] /
//! [`OutboundCodec`]. The adapters in [`hash`], [`block`] and [`aead`] exist
//! so the crate is actually exercisable end to end; a host embedding this
//! engine in a constrained environment is free to swap in its own
//! implementations of the same traits.

pub mod aead;
pub mod block;
pub mod drbg;
pub mod hash;
pub mod hmac_impl;

use crate::error::Result;

/// A keyed pseudo-random function as used by the TLS 1.2 PRF and the key
/// schedule; TLS 1.0/1.1's dual MD5+SHA1 PRF is out of scope (see
/// `SPEC_FULL.md`, this engine targets the single-hash TLS 1.2 construction).
pub trait Prf {
    /// Expand `secret`/`label`/`seed` into `out.len()` bytes of key material
    /// via the `P_hash` construction of RFC 5246 §5.
    fn expand(&self, secret: &[u8], label: &[u8], seed: &[u8], out: &mut [u8]) -> Result<()>;
}

/// A deterministic random bit generator used to produce explicit nonces,
/// IVs and other non-secret randomness the engine itself must source.
pub trait Drbg {
    /// Mix host-supplied entropy into the generator's state.
    fn reseed(&mut self, entropy: &[u8]);
    /// Fill `out` with pseudo-random bytes.
    fn generate(&mut self, out: &mut [u8]) -> Result<()>;
}
