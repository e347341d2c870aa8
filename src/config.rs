//! Builder-style configuration surface for assembling an [`Engine`].
//!
//! Mirrors the setter-heavy shape of an OpenSSL-style `SSL_CTX`/`SSL`
//! configuration object, generalized to this engine's narrower record-layer
//! scope: supported versions, cipher suites, buffer sizing, behavioural
//! flags, and an optional session cache.

use crate::engine::Engine;
use crate::error::{EngineError, Result};
use crate::flags::EngineFlags;
use crate::session::cache::LruSessionCache;
use crate::suites::CipherSuite;
use crate::version::{MAX_CIPHER_SUITES, TLS_1_0, TLS_1_2};

/// Configuration for the optional session cache attached to an engine's
/// owning context; the engine itself is cache-agnostic, this is consumed
/// by whatever constructs the cache instance.
pub struct CacheConfig {
    pub capacity: usize,
    pub mask_key: [u8; 32],
}

impl CacheConfig {
    pub fn new(capacity: usize, mask_key: [u8; 32]) -> Self {
        CacheConfig { capacity, mask_key }
    }

    pub fn build(&self) -> LruSessionCache {
        LruSessionCache::new(self.capacity, self.mask_key)
    }
}

/// Builder for an [`Engine`]'s static configuration.
pub struct EngineConfig {
    min_version: u16,
    max_version: u16,
    cipher_suites: Vec<u16>,
    input_buffer: usize,
    output_buffer: usize,
    flags: EngineFlags,
}

impl EngineConfig {
    pub fn new() -> Self {
        EngineConfig {
            min_version: TLS_1_0,
            max_version: TLS_1_2,
            cipher_suites: Vec::new(),
            input_buffer: crate::version::BUFSIZE_INPUT,
            output_buffer: crate::version::BUFSIZE_OUTPUT,
            flags: EngineFlags::empty(),
        }
    }

    pub fn with_versions(mut self, min_version: u16, max_version: u16) -> Result<Self> {
        if min_version > max_version {
            return Err(EngineError::BadParam);
        }
        self.min_version = min_version;
        self.max_version = max_version;
        Ok(self)
    }

    pub fn with_cipher_suites(mut self, suites: &[u16]) -> Result<Self> {
        if suites.len() > MAX_CIPHER_SUITES {
            return Err(EngineError::BadParam);
        }
        for &id in suites {
            if CipherSuite::from_id(id).is_none() {
                return Err(EngineError::BadCipherSuite);
            }
        }
        self.cipher_suites = suites.to_vec();
        Ok(self)
    }

    pub fn with_buffers(mut self, input: usize, output: usize) -> Self {
        self.input_buffer = input;
        self.output_buffer = output;
        self
    }

    pub fn with_flags(mut self, flags: EngineFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn min_version(&self) -> u16 {
        self.min_version
    }

    pub fn max_version(&self) -> u16 {
        self.max_version
    }

    pub fn cipher_suites(&self) -> &[u16] {
        &self.cipher_suites
    }

    /// Build the engine, using `max_version` as the initial record version
    /// (a handshake processor may later negotiate a lower one).
    pub fn build(&self) -> Engine {
        let mut engine = Engine::with_buffer_sizes(self.input_buffer, self.output_buffer);
        engine.set_version(self.max_version);
        engine.set_flags(self.flags);
        engine
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_version_range() {
        let result = EngineConfig::new().with_versions(TLS_1_2, TLS_1_0);
        assert_eq!(result.err(), Some(EngineError::BadParam));
    }

    #[test]
    fn rejects_unknown_cipher_suite() {
        let result = EngineConfig::new().with_cipher_suites(&[0xFFFF]);
        assert_eq!(result.err(), Some(EngineError::BadCipherSuite));
    }

    #[test]
    fn build_applies_configured_flags_and_version() {
        let engine = EngineConfig::new()
            .with_versions(TLS_1_0, TLS_1_2)
            .unwrap()
            .with_flags(EngineFlags::NO_RENEGOTIATION)
            .build();
        assert_eq!(engine.version(), TLS_1_2);
        assert!(engine.flags().contains(EngineFlags::NO_RENEGOTIATION));
    }
}
