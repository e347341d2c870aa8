//! Protocol version and record-type constants.
//!
//! Versions are the wire `(major, minor)` pair packed into a `u16` exactly as
//! they appear in the record header, e.g. TLS 1.2 is `0x0303`.

/// SSL 3.0, accepted only as a lower bound check target; never negotiable.
pub const SSL_3_0: u16 = 0x0300;
/// TLS 1.0.
pub const TLS_1_0: u16 = 0x0301;
/// TLS 1.1.
pub const TLS_1_1: u16 = 0x0302;
/// TLS 1.2.
pub const TLS_1_2: u16 = 0x0303;

/// Maximum plaintext fragment length (2^14), the TLS-mandated ceiling.
pub const MAX_PLAINTEXT_LEN: usize = 16384;
/// Maximum compressed-body length (2^14 + 1024); this engine never compresses
/// but still enforces the envelope so a peer cannot smuggle an oversized body.
pub const MAX_COMPRESSED_LEN: usize = 16384 + 1024;
/// Maximum ciphertext body length (2^14 + 2048), the hard cap on an incoming
/// record's `length` field regardless of active codec.
pub const MAX_CIPHERTEXT_LEN: usize = 16384 + 2048;

/// Recommended input buffer size: largest ciphertext record plus header and
/// codec slack.
pub const BUFSIZE_INPUT: usize = 16384 + 325;
/// Per-record overhead budget (header, explicit IV, MAC, padding) that a
/// staged plaintext write must leave free so encrypting it in place never
/// overruns the output buffer.
pub const RECORD_OVERHEAD_SLACK: usize = 85;
/// Recommended output buffer size: largest plaintext record plus header,
/// explicit IV, MAC and padding slack.
pub const BUFSIZE_OUTPUT: usize = 16384 + RECORD_OVERHEAD_SLACK;
/// Recommended combined buffer size for full-duplex deployments.
pub const BUFSIZE_BIDI: usize = BUFSIZE_INPUT + BUFSIZE_OUTPUT;

/// Maximum number of cipher suites the engine's configuration surface can
/// hold, matching the fixed-size suite list a handshake processor reads.
pub const MAX_CIPHER_SUITES: usize = 40;

/// TLS record content types (RFC 5246 §6.2.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ContentType {
    ChangeCipherSpec = 20,
    Alert = 21,
    Handshake = 22,
    ApplicationData = 23,
}

impl ContentType {
    /// Classify a raw wire byte, returning `None` for anything outside the
    /// four record types this engine understands.
    pub fn from_u8(b: u8) -> Option<Self> {
        match b {
            20 => Some(ContentType::ChangeCipherSpec),
            21 => Some(ContentType::Alert),
            22 => Some(ContentType::Handshake),
            23 => Some(ContentType::ApplicationData),
            _ => None,
        }
    }
}

/// Alert levels (RFC 5246 §7.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlertLevel {
    Warning = 1,
    Fatal = 2,
}

/// Well-known alert description codes this engine constructs or recognizes
/// directly; a wider range may arrive from the peer and is passed through
/// `EngineError::RecvFatalAlert` unchanged.
pub mod alert_code {
    pub const CLOSE_NOTIFY: u8 = 0;
    pub const UNEXPECTED_MESSAGE: u8 = 10;
    pub const BAD_RECORD_MAC: u8 = 20;
    pub const HANDSHAKE_FAILURE: u8 = 40;
    pub const NO_RENEGOTIATION: u8 = 100;
    pub const UNSUPPORTED_EXTENSION: u8 = 110;
}
