//! Record codecs: the pluggable encrypt/decrypt step between the wire and
//! the engine's plaintext buffers.
//!
//! Every codec implements [`OutboundCodec`] and [`InboundCodec`] against a
//! fixed content type, version and sequence number, never touching the
//! engine's scheduler state directly. [`Codec`] is the tagged union the
//! engine actually switches on a change-cipher-spec boundary.

pub mod cbc;
pub mod gcm;
pub mod null;

use crate::error::Result;

/// Capability an outbound codec exposes to the engine's write path.
pub trait OutboundCodec {
    /// Largest plaintext fragment this codec can wrap into one record
    /// without exceeding [`crate::version::MAX_CIPHERTEXT_LEN`].
    fn max_plaintext(&self) -> usize;

    /// Encrypt `plaintext` (content type, version and 64-bit sequence
    /// number passed separately since they are record-header fields, not
    /// codec state) into `out` as exactly one record body, returning the
    /// number of bytes written.
    fn encrypt(
        &mut self,
        content_type: u8,
        version: u16,
        seq: u64,
        plaintext: &[u8],
        out: &mut Vec<u8>,
    ) -> Result<()>;

    /// Whether emitting `plaintext_len` bytes needs a preceding
    /// empty-fragment record (the TLS 1.0 1/n-1 CBC split). The caller is
    /// responsible for actually emitting that record, with its own
    /// sequence number, before calling `encrypt` for the real fragment.
    fn needs_split_for(&self, _plaintext_len: usize) -> bool {
        false
    }
}

/// Capability an inbound codec exposes to the engine's read path.
pub trait InboundCodec {
    /// Reject a ciphertext length before doing any cryptography, so a
    /// peer cannot force expensive work with a malformed record.
    fn check_length(&self, len: usize) -> Result<()>;

    /// Decrypt `ciphertext` in place, returning the plaintext length.
    /// Implementations must use constant-time comparisons for any
    /// MAC/padding check (see `cbc::verify_mac_and_padding`).
    fn decrypt(
        &mut self,
        content_type: u8,
        version: u16,
        seq: u64,
        ciphertext: &mut [u8],
    ) -> Result<usize>;
}

/// The active record protection, switched in lock-step on both sides at a
/// change-cipher-spec boundary.
pub enum Codec {
    Null(null::NullCodec),
    Cbc(cbc::CbcCodec),
    Gcm(gcm::GcmCodec),
}

impl OutboundCodec for Codec {
    fn max_plaintext(&self) -> usize {
        match self {
            Codec::Null(c) => c.max_plaintext(),
            Codec::Cbc(c) => c.max_plaintext(),
            Codec::Gcm(c) => c.max_plaintext(),
        }
    }

    fn encrypt(
        &mut self,
        content_type: u8,
        version: u16,
        seq: u64,
        plaintext: &[u8],
        out: &mut Vec<u8>,
    ) -> Result<()> {
        match self {
            Codec::Null(c) => c.encrypt(content_type, version, seq, plaintext, out),
            Codec::Cbc(c) => c.encrypt(content_type, version, seq, plaintext, out),
            Codec::Gcm(c) => c.encrypt(content_type, version, seq, plaintext, out),
        }
    }

    fn needs_split_for(&self, plaintext_len: usize) -> bool {
        match self {
            Codec::Null(c) => c.needs_split_for(plaintext_len),
            Codec::Cbc(c) => c.needs_split_for(plaintext_len),
            Codec::Gcm(c) => c.needs_split_for(plaintext_len),
        }
    }
}

impl InboundCodec for Codec {
    fn check_length(&self, len: usize) -> Result<()> {
        match self {
            Codec::Null(c) => c.check_length(len),
            Codec::Cbc(c) => c.check_length(len),
            Codec::Gcm(c) => c.check_length(len),
        }
    }

    fn decrypt(
        &mut self,
        content_type: u8,
        version: u16,
        seq: u64,
        ciphertext: &mut [u8],
    ) -> Result<usize> {
        match self {
            Codec::Null(c) => c.decrypt(content_type, version, seq, ciphertext),
            Codec::Cbc(c) => c.decrypt(content_type, version, seq, ciphertext),
            Codec::Gcm(c) => c.decrypt(content_type, version, seq, ciphertext),
        }
    }
}

/// Build the 13-byte TLS 1.2 MAC/AAD input: `seq || type || version || length`.
pub(crate) fn build_aad(content_type: u8, version: u16, seq: u64, len: u16) -> [u8; 13] {
    let mut aad = [0u8; 13];
    aad[0..8].copy_from_slice(&seq.to_be_bytes());
    aad[8] = content_type;
    aad[9..11].copy_from_slice(&version.to_be_bytes());
    aad[11..13].copy_from_slice(&len.to_be_bytes());
    aad
}
