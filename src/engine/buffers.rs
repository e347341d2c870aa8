//! The two-region, three-cursor buffer backing one direction's I/O.
//!
//! Mirrors BearSSL's `ixa/ixb/ixc` (inbound) and `oxa/oxb/oxc` (outbound)
//! cursor triples: `[0, a)` is already consumed, `[a, b)` is the "ready"
//! region (decrypted application data on the inbound side, encrypted
//! records pending transmission on the outbound side), `[b, c)` is the
//! "staged" region (raw undecrypted bytes inbound, unencrypted app data
//! outbound), and `[c, capacity)` is free space. Both directions share a
//! single allocation across their ready and staged regions, so filling one
//! region necessarily shrinks the other's available space — the buffer
//! model the "stream exclusion" invariant in [`crate::flags`] depends on.

use crate::error::{EngineError, Result};

#[derive(Debug)]
pub struct PartitionedBuffer {
    data: Vec<u8>,
    a: usize,
    b: usize,
    c: usize,
}

impl PartitionedBuffer {
    pub fn with_capacity(cap: usize) -> Self {
        PartitionedBuffer {
            data: vec![0u8; cap],
            a: 0,
            b: 0,
            c: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// The ready region: data available for the owning side's reader.
    pub fn ready(&self) -> &[u8] {
        &self.data[self.a..self.b]
    }

    pub fn ready_len(&self) -> usize {
        self.b - self.a
    }

    pub fn ready_is_empty(&self) -> bool {
        self.a == self.b
    }

    /// Acknowledge `n` consumed bytes from the front of the ready region.
    pub fn ack_ready(&mut self, n: usize) -> Result<()> {
        if n > self.ready_len() {
            return Err(EngineError::BadParam);
        }
        self.a += n;
        self.normalize();
        Ok(())
    }

    /// The staged region: raw bytes written by the producer but not yet
    /// transformed into the ready region.
    pub fn staged(&self) -> &[u8] {
        &self.data[self.b..self.c]
    }

    pub fn staged_len(&self) -> usize {
        self.c - self.b
    }

    /// Writable free space past the staged region, compacted so it is
    /// always contiguous.
    pub fn free_mut(&mut self) -> &mut [u8] {
        self.compact();
        &mut self.data[self.c..]
    }

    pub fn free_len(&self) -> usize {
        self.data.len() - self.c + self.a
    }

    /// Commit `n` freshly written bytes into the staged region.
    pub fn commit_staged(&mut self, n: usize) -> Result<()> {
        self.compact();
        if self.c + n > self.data.len() {
            return Err(EngineError::TooLarge);
        }
        self.c += n;
        Ok(())
    }

    /// Remove `consume` bytes from the front of the staged region and
    /// append `produced` to the end of the ready region, in one atomic
    /// step. `produced` need not be the same length as `consume`: this is
    /// how a 13-byte ciphertext header+body gets produced from a shorter
    /// plaintext chunk, or a shorter plaintext gets produced from a longer
    /// ciphertext record.
    pub fn promote(&mut self, consume: usize, produced: &[u8]) -> Result<()> {
        if consume > self.staged_len() {
            return Err(EngineError::BadParam);
        }
        // Reclaim any already-acknowledged prefix first, so growth (e.g.
        // ciphertext overhead exceeding the plaintext it replaces) can use
        // space freed by a host that has been draining the ready region.
        self.compact();
        let remaining_start = self.b + consume;
        let remaining_len = self.c - remaining_start;
        let new_b = self.b + produced.len();
        let new_c = new_b + remaining_len;
        if new_c > self.data.len() {
            return Err(EngineError::TooLarge);
        }
        if remaining_len > 0 {
            self.data.copy_within(remaining_start..remaining_start + remaining_len, new_b);
        }
        self.data[self.b..new_b].copy_from_slice(produced);
        self.b = new_b;
        self.c = new_c;
        Ok(())
    }

    fn compact(&mut self) {
        if self.a > 0 {
            self.data.copy_within(self.a..self.c, 0);
            self.b -= self.a;
            self.c -= self.a;
            self.a = 0;
        }
    }

    fn normalize(&mut self) {
        if self.a == self.b && self.b == self.c {
            self.a = 0;
            self.b = 0;
            self.c = 0;
        }
    }
}
