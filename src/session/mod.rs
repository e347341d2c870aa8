//! Session resumption parameters and the cache that stores them.

pub mod cache;

use zeroize::Zeroize;

/// Session IDs are fixed-length 32-byte opaque handles.
pub const SESSION_ID_LEN: usize = 32;
/// TLS's master secret is always 48 bytes regardless of cipher suite.
pub const MASTER_SECRET_LEN: usize = 48;

/// Everything needed to resume a session without a full handshake.
/// Zeroized on drop since `master_secret` is long-term key material.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SessionParameters {
    pub session_id: [u8; SESSION_ID_LEN],
    pub session_id_len: u8,
    pub master_secret: [u8; MASTER_SECRET_LEN],
    pub version: u16,
    pub cipher_suite: u16,
}

impl SessionParameters {
    pub fn new(session_id: &[u8], master_secret: &[u8; MASTER_SECRET_LEN], version: u16, cipher_suite: u16) -> Self {
        let mut id = [0u8; SESSION_ID_LEN];
        let len = session_id.len().min(SESSION_ID_LEN);
        id[..len].copy_from_slice(&session_id[..len]);
        SessionParameters {
            session_id: id,
            session_id_len: len as u8,
            master_secret: *master_secret,
            version,
            cipher_suite,
        }
    }

    pub fn id(&self) -> &[u8] {
        &self.session_id[..self.session_id_len as usize]
    }
}
