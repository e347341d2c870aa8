//! TLS record header parsing and serialization.

use crate::error::{EngineError, Result};
use crate::version::{ContentType, MAX_CIPHERTEXT_LEN};

/// A record header's fixed 5-byte prefix: type, version, length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub content_type: ContentType,
    pub version: u16,
    pub length: u16,
}

/// Size in bytes of the on-wire record header.
pub const HEADER_LEN: usize = 5;

impl RecordHeader {
    /// Parse a 5-byte header, rejecting unknown content types up front so
    /// the caller never has to special-case them downstream.
    pub fn parse(buf: &[u8]) -> Result<RecordHeader> {
        if buf.len() < HEADER_LEN {
            return Err(EngineError::BadLength);
        }
        let content_type = ContentType::from_u8(buf[0]).ok_or(EngineError::UnknownType)?;
        let version = u16::from_be_bytes([buf[1], buf[2]]);
        let length = u16::from_be_bytes([buf[3], buf[4]]);
        if length as usize > MAX_CIPHERTEXT_LEN {
            return Err(EngineError::BadLength);
        }
        Ok(RecordHeader {
            content_type,
            version,
            length,
        })
    }

    /// Serialize into the 5-byte wire form.
    pub fn write(&self, out: &mut [u8; HEADER_LEN]) {
        out[0] = self.content_type as u8;
        out[1..3].copy_from_slice(&self.version.to_be_bytes());
        out[3..5].copy_from_slice(&self.length.to_be_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_header() {
        let bytes = [23u8, 0x03, 0x03, 0x00, 0x10];
        let header = RecordHeader::parse(&bytes).unwrap();
        assert_eq!(header.content_type, ContentType::ApplicationData);
        assert_eq!(header.version, 0x0303);
        assert_eq!(header.length, 16);
    }

    #[test]
    fn rejects_unknown_content_type() {
        let bytes = [99u8, 0x03, 0x03, 0x00, 0x00];
        assert_eq!(RecordHeader::parse(&bytes), Err(EngineError::UnknownType));
    }

    #[test]
    fn rejects_truncated_header() {
        let bytes = [23u8, 0x03];
        assert_eq!(RecordHeader::parse(&bytes), Err(EngineError::BadLength));
    }

    #[test]
    fn round_trips_through_write() {
        let header = RecordHeader {
            content_type: ContentType::Handshake,
            version: 0x0301,
            length: 42,
        };
        let mut buf = [0u8; HEADER_LEN];
        header.write(&mut buf);
        assert_eq!(RecordHeader::parse(&buf).unwrap(), header);
    }
}
