//! LRU + unbalanced binary search tree session cache over a fixed-capacity
//! arena, keyed by an HMAC-masked session ID so an adversary who can choose
//! session IDs cannot force the tree into a degenerate, linear-search shape.
//!
//! Grounded directly in BearSSL's `br_ssl_session_cache_lru`: a doubly
//! linked list gives O(1) LRU promotion/eviction, a binary search tree over
//! the masked ID gives O(log n) average lookup, and the mask is an
//! HMAC-SHA-256 keyed with bytes private to the cache instance so the tree
//! shape cannot be influenced by a peer who only controls the plaintext
//! session ID.

use hmac::{Hmac, Mac as HmacTrait};
use sha2::Sha256;

use crate::error::{EngineError, Result};
use crate::session::{SessionParameters, MASTER_SECRET_LEN, SESSION_ID_LEN};

type HmacSha256 = Hmac<Sha256>;

/// Sentinel for "no node", matching BearSSL's `0xFFFFFFFF` address marker.
const NONE: u32 = 0xFFFFFFFF;

struct Entry {
    session_id: [u8; SESSION_ID_LEN],
    session_id_len: u8,
    masked_id: [u8; 32],
    master_secret: [u8; MASTER_SECRET_LEN],
    version: u16,
    cipher_suite: u16,
    list_prev: u32,
    list_next: u32,
    tree_left: u32,
    tree_right: u32,
}

/// A fixed-capacity session cache with LRU eviction.
pub struct LruSessionCache {
    entries: Vec<Entry>,
    capacity: usize,
    head: u32, // most recently used
    tail: u32, // least recently used
    root: u32,
    mask_key: [u8; 32],
}

impl LruSessionCache {
    /// `mask_key` should be drawn from the host's DRBG once at cache
    /// construction and never reused across unrelated caches.
    pub fn new(capacity: usize, mask_key: [u8; 32]) -> Self {
        LruSessionCache {
            entries: Vec::with_capacity(capacity),
            capacity,
            head: NONE,
            tail: NONE,
            root: NONE,
            mask_key,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn mask_id(&self, session_id: &[u8]) -> [u8; 32] {
        let mut mac =
            HmacSha256::new_from_slice(&self.mask_key).expect("HMAC accepts keys of any length");
        mac.update(session_id);
        let result = mac.finalize().into_bytes();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Search the tree for a node whose masked ID exactly matches. Returns
    /// the node's index, or `NONE` if not found.
    fn find_node(&self, masked: &[u8; 32]) -> u32 {
        let mut cur = self.root;
        while cur != NONE {
            let node = &self.entries[cur as usize];
            match masked.cmp(&node.masked_id) {
                core::cmp::Ordering::Equal => return cur,
                core::cmp::Ordering::Less => cur = node.tree_left,
                core::cmp::Ordering::Greater => cur = node.tree_right,
            }
        }
        NONE
    }

    /// Insert `idx` (already populated with its `masked_id`) into the tree.
    fn tree_insert(&mut self, idx: u32) {
        if self.root == NONE {
            self.root = idx;
            return;
        }
        let mut cur = self.root;
        loop {
            let masked = self.entries[idx as usize].masked_id;
            let node = &self.entries[cur as usize];
            let go_left = masked < node.masked_id;
            let next = if go_left { node.tree_left } else { node.tree_right };
            if next == NONE {
                if go_left {
                    self.entries[cur as usize].tree_left = idx;
                } else {
                    self.entries[cur as usize].tree_right = idx;
                }
                return;
            }
            cur = next;
        }
    }

    /// Remove `idx` from the tree, rewiring its parent to point at the
    /// conventional BST-delete replacement.
    fn tree_remove(&mut self, idx: u32) {
        let mut parent = NONE;
        let mut parent_is_left = false;
        let mut cur = self.root;
        while cur != idx {
            parent = cur;
            let node = &self.entries[cur as usize];
            if self.entries[idx as usize].masked_id < node.masked_id {
                parent_is_left = true;
                cur = node.tree_left;
            } else {
                parent_is_left = false;
                cur = node.tree_right;
            }
        }

        let left = self.entries[idx as usize].tree_left;
        let right = self.entries[idx as usize].tree_right;

        let replacement = if left == NONE {
            right
        } else if right == NONE {
            left
        } else {
            // two children: splice in the in-order successor (leftmost node
            // of the right subtree), detaching it from its own spot first.
            let mut succ_parent = idx;
            let mut succ = right;
            while self.entries[succ as usize].tree_left != NONE {
                succ_parent = succ;
                succ = self.entries[succ as usize].tree_left;
            }
            if succ_parent != idx {
                self.entries[succ_parent as usize].tree_left = self.entries[succ as usize].tree_right;
                self.entries[succ as usize].tree_right = right;
            }
            self.entries[succ as usize].tree_left = left;
            succ
        };

        self.set_child(parent, parent_is_left, replacement);
    }

    fn set_child(&mut self, parent: u32, is_left: bool, child: u32) {
        if parent == NONE {
            self.root = child;
        } else if is_left {
            self.entries[parent as usize].tree_left = child;
        } else {
            self.entries[parent as usize].tree_right = child;
        }
    }

    fn list_unlink(&mut self, idx: u32) {
        let (prev, next) = {
            let node = &self.entries[idx as usize];
            (node.list_prev, node.list_next)
        };
        if prev != NONE {
            self.entries[prev as usize].list_next = next;
        } else {
            self.head = next;
        }
        if next != NONE {
            self.entries[next as usize].list_prev = prev;
        } else {
            self.tail = prev;
        }
    }

    fn list_push_front(&mut self, idx: u32) {
        self.entries[idx as usize].list_prev = NONE;
        self.entries[idx as usize].list_next = self.head;
        if self.head != NONE {
            self.entries[self.head as usize].list_prev = idx;
        }
        self.head = idx;
        if self.tail == NONE {
            self.tail = idx;
        }
    }

    /// Insert a session's parameters, evicting the least recently used
    /// entry if the cache is already at capacity. A masked-ID collision
    /// with an existing entry is a no-op.
    pub fn save(&mut self, params: &SessionParameters) -> Result<()> {
        if self.capacity == 0 {
            return Err(EngineError::BadParam);
        }
        let masked = self.mask_id(params.id());

        // BearSSL's `lru_save` returns immediately on a masked-ID collision
        // rather than updating the existing entry; match that exactly.
        if self.find_node(&masked) != NONE {
            return Ok(());
        }

        let idx = if self.entries.len() < self.capacity {
            let idx = self.entries.len() as u32;
            self.entries.push(Entry {
                session_id: params.session_id,
                session_id_len: params.session_id_len,
                masked_id: masked,
                master_secret: params.master_secret,
                version: params.version,
                cipher_suite: params.cipher_suite,
                list_prev: NONE,
                list_next: NONE,
                tree_left: NONE,
                tree_right: NONE,
            });
            idx
        } else {
            let evict = self.tail;
            self.list_unlink(evict);
            self.tree_remove(evict);
            let e = &mut self.entries[evict as usize];
            e.session_id = params.session_id;
            e.session_id_len = params.session_id_len;
            e.masked_id = masked;
            e.master_secret = params.master_secret;
            e.version = params.version;
            e.cipher_suite = params.cipher_suite;
            e.tree_left = NONE;
            e.tree_right = NONE;
            evict
        };

        self.tree_insert(idx);
        self.list_push_front(idx);
        Ok(())
    }

    /// Look up a session by its plaintext ID, promoting it to
    /// most-recently-used on a hit.
    pub fn load(&mut self, session_id: &[u8]) -> Option<SessionParameters> {
        let masked = self.mask_id(session_id);
        let idx = self.find_node(&masked);
        if idx == NONE {
            return None;
        }
        self.list_unlink(idx);
        self.list_push_front(idx);

        let e = &self.entries[idx as usize];
        Some(SessionParameters::new(
            &e.session_id[..e.session_id_len as usize],
            &e.master_secret,
            e.version,
            e.cipher_suite,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(id: u8) -> SessionParameters {
        SessionParameters::new(&[id; SESSION_ID_LEN], &[id; MASTER_SECRET_LEN], 0x0303, 0xC02F)
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut cache = LruSessionCache::new(4, [0x11; 32]);
        cache.save(&params(1)).unwrap();
        let loaded = cache.load(&[1u8; SESSION_ID_LEN]).unwrap();
        assert_eq!(loaded.master_secret, [1u8; MASTER_SECRET_LEN]);
    }

    #[test]
    fn unknown_id_misses() {
        let mut cache = LruSessionCache::new(4, [0x11; 32]);
        cache.save(&params(1)).unwrap();
        assert!(cache.load(&[2u8; SESSION_ID_LEN]).is_none());
    }

    #[test]
    fn evicts_least_recently_used_when_full() {
        let mut cache = LruSessionCache::new(2, [0x22; 32]);
        cache.save(&params(1)).unwrap();
        cache.save(&params(2)).unwrap();
        // touch session 1 so session 2 becomes the LRU victim
        cache.load(&[1u8; SESSION_ID_LEN]).unwrap();
        cache.save(&params(3)).unwrap();

        assert!(cache.load(&[2u8; SESSION_ID_LEN]).is_none());
        assert!(cache.load(&[1u8; SESSION_ID_LEN]).is_some());
        assert!(cache.load(&[3u8; SESSION_ID_LEN]).is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn saving_over_an_existing_session_is_a_no_op() {
        let mut cache = LruSessionCache::new(4, [0x33; 32]);
        cache.save(&params(1)).unwrap();
        let mut updated = params(1);
        updated.master_secret = [0xAB; MASTER_SECRET_LEN];
        cache.save(&updated).unwrap();

        assert_eq!(cache.len(), 1);
        let loaded = cache.load(&[1u8; SESSION_ID_LEN]).unwrap();
        assert_eq!(loaded.master_secret, [1u8; MASTER_SECRET_LEN]);
    }

    #[test]
    fn survives_many_insertions_past_capacity() {
        let mut cache = LruSessionCache::new(8, [0x44; 32]);
        for i in 0..64u8 {
            cache.save(&params(i)).unwrap();
        }
        assert_eq!(cache.len(), 8);
        // the most recent 8 ids should all be present
        for i in 56..64u8 {
            assert!(cache.load(&[i; SESSION_ID_LEN]).is_some());
        }
    }
}
