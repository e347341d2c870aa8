//! Engine error taxonomy
//!
//! Mirrors the small-integer error codes a host-driven TLS engine must expose
//! across an FFI-shaped boundary, while staying an idiomatic `std::error::Error`
//! on the Rust side. Local/protocol errors occupy 1..=31, certificate/validation
//! errors are delegated (32..=63) to the external X.509 verifier and are not
//! constructed here, received fatal alerts occupy 256.., and alerts the engine
//! itself decides to send occupy 512...

use thiserror::Error;

/// Base offset added to a received fatal alert's code to form the wire-compatible
/// sticky error value.
pub const RECV_FATAL_ALERT_BASE: u32 = 256;

/// Base offset added to an alert the engine emits to form the wire-compatible
/// sticky error value.
pub const SEND_FATAL_ALERT_BASE: u32 = 512;

/// All local/protocol-level engine faults, plus the two alert bands.
///
/// Variant order and discriminants follow the taxonomy byte-for-byte so that
/// `u32::from(err)` reproduces the numbers a non-Rust host would see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("bad parameter")]
    BadParam,
    #[error("bad state")]
    BadState,
    #[error("unsupported version")]
    UnsupportedVersion,
    #[error("bad version")]
    BadVersion,
    #[error("bad length")]
    BadLength,
    #[error("too large")]
    TooLarge,
    #[error("bad record mac")]
    BadMac,
    #[error("no random source available")]
    NoRandom,
    #[error("unknown record type")]
    UnknownType,
    #[error("unexpected record")]
    Unexpected,
    #[error("bad change-cipher-spec")]
    BadCcs,
    #[error("bad alert")]
    BadAlert,
    #[error("bad handshake message")]
    BadHandshake,
    #[error("oversized session id")]
    OversizedId,
    #[error("bad cipher suite")]
    BadCipherSuite,
    #[error("bad compression")]
    BadCompression,
    #[error("bad fragment length")]
    BadFragLen,
    #[error("bad secure renegotiation state")]
    BadSecReneg,
    #[error("extra/duplicate extension")]
    ExtraExtension,
    #[error("bad server name indication")]
    BadSni,
    #[error("bad server hello done")]
    BadHelloDone,
    #[error("limit exceeded")]
    LimitExceeded,
    #[error("bad finished message")]
    BadFinished,
    #[error("session resumption mismatch")]
    ResumeMismatch,
    #[error("invalid algorithm")]
    InvalidAlgorithm,
    #[error("bad signature")]
    BadSignature,
    #[error("I/O error reported by host")]
    Io,
    /// A fatal alert received from the peer, carrying its RFC 5246 §7.2 code.
    #[error("received fatal alert {0}")]
    RecvFatalAlert(u8),
    /// A fatal alert the engine decided to send, carrying its code.
    #[error("sent fatal alert {0}")]
    SendFatalAlert(u8),
}

impl EngineError {
    /// Wire-compatible small-integer code for this error.
    pub fn code(self) -> u32 {
        match self {
            EngineError::RecvFatalAlert(code) => RECV_FATAL_ALERT_BASE + code as u32,
            EngineError::SendFatalAlert(code) => SEND_FATAL_ALERT_BASE + code as u32,
            other => other.local_code() as u32,
        }
    }

    /// The discriminant for local/protocol errors (1..=31); meaningless for the
    /// two alert variants, which have no fixed discriminant of their own.
    fn local_code(self) -> u8 {
        match self {
            EngineError::BadParam => 1,
            EngineError::BadState => 2,
            EngineError::UnsupportedVersion => 3,
            EngineError::BadVersion => 4,
            EngineError::BadLength => 5,
            EngineError::TooLarge => 6,
            EngineError::BadMac => 7,
            EngineError::NoRandom => 8,
            EngineError::UnknownType => 9,
            EngineError::Unexpected => 10,
            EngineError::BadCcs => 12,
            EngineError::BadAlert => 13,
            EngineError::BadHandshake => 14,
            EngineError::OversizedId => 15,
            EngineError::BadCipherSuite => 16,
            EngineError::BadCompression => 17,
            EngineError::BadFragLen => 18,
            EngineError::BadSecReneg => 19,
            EngineError::ExtraExtension => 20,
            EngineError::BadSni => 21,
            EngineError::BadHelloDone => 22,
            EngineError::LimitExceeded => 23,
            EngineError::BadFinished => 24,
            EngineError::ResumeMismatch => 25,
            EngineError::InvalidAlgorithm => 26,
            EngineError::BadSignature => 27,
            EngineError::Io => 31,
            EngineError::RecvFatalAlert(_) | EngineError::SendFatalAlert(_) => 0,
        }
    }

    /// True for alert codes that RFC 5246 treats as fatal-for-closing even when
    /// carried at warning level (currently just `close_notify`, code 0).
    pub fn is_close_notify(self) -> bool {
        matches!(self, EngineError::RecvFatalAlert(0))
    }
}

/// Result alias used throughout the crate, matching `nssl::error::SslResult`.
pub type Result<T> = core::result::Result<T, EngineError>;
