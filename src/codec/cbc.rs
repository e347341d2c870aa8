//! CBC+HMAC codec: AES-CBC confidentiality with an HMAC-SHA-1/SHA-256 MAC,
//! constant-time MAC/padding verification, and the TLS 1.0 1/n-1 split.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::codec::{build_aad, InboundCodec, OutboundCodec};
use crate::error::{EngineError, Result};
use crate::primitives::block::BlockCipherCbc;
use crate::primitives::hmac_impl::HmacAlg;
use crate::version::{MAX_CIPHERTEXT_LEN, TLS_1_0};

/// Maximum padding a decrypt pass scans over; bounds the constant-time
/// padding check's cost independent of the actual pad length claimed.
const MAX_PAD_SCAN: usize = 256;

/// CBC+HMAC record protection for one direction.
pub struct CbcCodec {
    pub cipher: &'static dyn BlockCipherCbc,
    pub hmac: &'static dyn HmacAlg,
    pub enc_key: Vec<u8>,
    pub mac_key: Vec<u8>,
    /// The record version this codec was set up for; TLS 1.0 gets the
    /// empty-fragment 1/n-1 split, TLS 1.1/1.2 carry an explicit IV instead.
    pub version: u16,
    /// Implicit IV state for TLS 1.0 (the last ciphertext block becomes the
    /// next record's IV); unused for TLS 1.1/1.2's explicit per-record IV.
    pub implicit_iv: [u8; 16],
}

impl CbcCodec {
    fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    fn mac_len(&self) -> usize {
        self.hmac.output_len()
    }
}

impl OutboundCodec for CbcCodec {
    fn max_plaintext(&self) -> usize {
        // conservative: leaves room for IV, MAC and a full padding block
        crate::version::MAX_PLAINTEXT_LEN
    }

    fn encrypt(
        &mut self,
        content_type: u8,
        version: u16,
        seq: u64,
        plaintext: &[u8],
        out: &mut Vec<u8>,
    ) -> Result<()> {
        self.encrypt_one(content_type, version, seq, plaintext, out)
    }

    /// TLS 1.0 CBC needs the 1/n-1 split (BEAST mitigation) for any
    /// nonempty fragment: an empty-fragment record consuming its own
    /// sequence number, emitted by the caller before the real fragment.
    fn needs_split_for(&self, plaintext_len: usize) -> bool {
        self.version == TLS_1_0 && plaintext_len > 0
    }
}

impl CbcCodec {
    fn encrypt_one(
        &mut self,
        content_type: u8,
        version: u16,
        seq: u64,
        data: &[u8],
        out: &mut Vec<u8>,
    ) -> Result<()> {
        let block_size = self.block_size();
        let mac_len = self.mac_len();

        let aad = build_aad(content_type, version, seq, data.len() as u16);
        let mut mac = vec![0u8; mac_len];
        self.hmac.mac(&self.mac_key, &[&aad[..], data].concat(), &mut mac);

        let mut body = Vec::with_capacity(data.len() + mac_len + block_size);
        body.extend_from_slice(data);
        body.extend_from_slice(&mac);
        let pad_len = block_size - (body.len() % block_size);
        body.extend(std::iter::repeat((pad_len - 1) as u8).take(pad_len));

        let iv = self.implicit_iv;
        if self.version != TLS_1_0 {
            out.extend_from_slice(&iv);
        }
        self.cipher.encrypt(&self.enc_key, &iv, &mut body)?;
        // Chain the IV forward regardless of version: TLS 1.0 relies on
        // this implicitly, TLS 1.1/1.2 just overwrite it with a fresh
        // explicit IV before the next call.
        self.implicit_iv.copy_from_slice(&body[body.len() - 16..]);
        out.extend_from_slice(&body);
        Ok(())
    }
}

impl InboundCodec for CbcCodec {
    fn check_length(&self, len: usize) -> Result<()> {
        let min = if self.version == TLS_1_0 { 0 } else { 16 };
        let block_size = self.block_size();
        if len > MAX_CIPHERTEXT_LEN {
            return Err(EngineError::TooLarge);
        }
        if len < min + block_size || (len - min) % block_size != 0 {
            return Err(EngineError::BadLength);
        }
        Ok(())
    }

    fn decrypt(
        &mut self,
        content_type: u8,
        version: u16,
        seq: u64,
        ciphertext: &mut [u8],
    ) -> Result<usize> {
        self.check_length(ciphertext.len())?;
        let block_size = self.block_size();
        let mac_len = self.mac_len();

        let (iv, body_start) = if self.version == TLS_1_0 {
            (self.implicit_iv, 0)
        } else {
            let mut iv = [0u8; 16];
            iv.copy_from_slice(&ciphertext[..16]);
            (iv, 16)
        };
        let body = &mut ciphertext[body_start..];
        if self.version == TLS_1_0 {
            self.implicit_iv.copy_from_slice(&body[body.len() - 16..]);
        }

        self.cipher.decrypt(&self.enc_key, &iv, body)?;

        verify_mac_and_padding(body, &self.mac_key, self.hmac, content_type, version, seq, mac_len)
    }
}

/// Constant-time MAC and padding verification (Lucky-13 resistance): scans
/// every candidate padding length up to [`MAX_PAD_SCAN`] regardless of the
/// claimed length, and combines the MAC/padding verdicts without an early
/// branch on either.
fn verify_mac_and_padding(
    body: &mut [u8],
    mac_key: &[u8],
    hmac: &dyn HmacAlg,
    content_type: u8,
    version: u16,
    seq: u64,
    mac_len: usize,
) -> Result<usize> {
    if body.len() < mac_len + 1 {
        return Err(EngineError::BadMac);
    }

    let claimed_pad = body[body.len() - 1];
    let scan_limit = core::cmp::min(MAX_PAD_SCAN, body.len());

    // padding_ok: every byte in the claimed padding run equals claimed_pad.
    let mut padding_ok = Choice::from(1u8);
    for i in 0..scan_limit {
        let idx = body.len() - 1 - i;
        let within_claimed = (i as u8).ct_lt(&claimed_pad.wrapping_add(1));
        let matches = body[idx].ct_eq(&claimed_pad);
        let ok_here = !within_claimed | matches;
        padding_ok &= ok_here;
    }
    let pad_len_plausible = Choice::from((claimed_pad as usize + 1 <= body.len() - mac_len) as u8);
    padding_ok &= pad_len_plausible;

    let pad_len = u8::conditional_select(&0, &claimed_pad, pad_len_plausible) as usize + 1;
    let plain_len = body.len().saturating_sub(mac_len + pad_len);

    let aad = build_aad(content_type, version, seq, plain_len as u16);
    let mut expected_mac = vec![0u8; mac_len];
    hmac.mac(mac_key, &[&aad[..], &body[..plain_len]].concat(), &mut expected_mac);

    let mac_start = body.len().saturating_sub(mac_len + pad_len);
    let received_mac = &body[mac_start..mac_start + mac_len];
    let mac_ok = expected_mac.as_slice().ct_eq(received_mac);

    let all_ok = padding_ok & mac_ok;
    if all_ok.unwrap_u8() == 1 {
        Ok(plain_len)
    } else {
        Err(EngineError::BadMac)
    }
}

trait CtLt {
    fn ct_lt(&self, other: &Self) -> Choice;
}

impl CtLt for u8 {
    fn ct_lt(&self, other: &u8) -> Choice {
        // branchless unsigned less-than via borrow bit
        let diff = (*self as i16) - (*other as i16);
        Choice::from(((diff >> 15) & 1) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::block::Aes128Cbc;
    use crate::primitives::hmac_impl::HmacSha1;

    fn test_codec(version: u16) -> CbcCodec {
        CbcCodec {
            cipher: &Aes128Cbc,
            hmac: &HmacSha1,
            enc_key: vec![0x11; 16],
            mac_key: vec![0x22; 20],
            version,
            implicit_iv: [0x33; 16],
        }
    }

    #[test]
    fn tls12_round_trips() {
        let mut enc = test_codec(crate::version::TLS_1_2);
        let mut dec = test_codec(crate::version::TLS_1_2);
        let mut out = Vec::new();
        enc.encrypt(23, crate::version::TLS_1_2, 0, b"hello world", &mut out)
            .unwrap();

        let mut buf = out;
        let n = dec.decrypt(23, crate::version::TLS_1_2, 0, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"hello world");
    }

    #[test]
    fn tampered_mac_is_rejected() {
        let mut enc = test_codec(crate::version::TLS_1_2);
        let mut dec = test_codec(crate::version::TLS_1_2);
        let mut out = Vec::new();
        enc.encrypt(23, crate::version::TLS_1_2, 0, b"hello world", &mut out)
            .unwrap();

        let mut buf = out;
        let last = buf.len() - 1;
        buf[last] ^= 0x01;
        assert_eq!(
            dec.decrypt(23, crate::version::TLS_1_2, 0, &mut buf),
            Err(EngineError::BadMac)
        );
    }

    #[test]
    fn tls10_reports_split_needed_for_nonempty_fragments() {
        let codec = test_codec(TLS_1_0);
        assert!(codec.needs_split_for(11));
        assert!(!codec.needs_split_for(0));
    }

    #[test]
    fn tls12_never_needs_split() {
        let codec = test_codec(crate::version::TLS_1_2);
        assert!(!codec.needs_split_for(11));
    }

    #[test]
    fn tls10_round_trips_with_explicit_split_records() {
        let mut enc = test_codec(TLS_1_0);
        let mut dec = test_codec(TLS_1_0);

        let mut empty_record = Vec::new();
        enc.encrypt(23, TLS_1_0, 0, &[], &mut empty_record).unwrap();
        let mut real_record = Vec::new();
        enc.encrypt(23, TLS_1_0, 1, b"hello world", &mut real_record).unwrap();

        let mut empty_buf = empty_record;
        let n = dec.decrypt(23, TLS_1_0, 0, &mut empty_buf).unwrap();
        assert_eq!(n, 0);

        let mut real_buf = real_record;
        let n = dec.decrypt(23, TLS_1_0, 1, &mut real_buf).unwrap();
        assert_eq!(&real_buf[..n], b"hello world");
    }
}
